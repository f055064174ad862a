//! # verdantd: verdant daemon
//!
//! Composition root that wires all adapters together, starts the periodic
//! lifecycle passes and serves the HTTP trigger API.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the services, injecting repositories, notifier, clock and
//!   random source via port traits
//! - Start one periodic job per pass
//! - Bind to a TCP port and serve until Ctrl-C, then stop the jobs
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use verdant_adapter_http_axum::state::AppState;
use verdant_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteGrowthRepository, SqlitePlantRepository, SqliteTaskRepository,
};
use verdant_app::jobs::{Jobs, spawn_periodic};
use verdant_app::notifier::LogNotifier;
use verdant_app::ports::{SeededRandom, SystemClock};
use verdant_app::services::{
    CleanupService, GrowthEngine, HealthMonitor, MaintenanceScheduler, PestEngine,
    ReminderService,
};
use verdant_domain::error::VerdantError;

use crate::config::{Config, JobsConfig};

type State = AppState<
    SqlitePlantRepository,
    SqliteGrowthRepository,
    SqliteTaskRepository,
    Arc<LogNotifier>,
    Arc<SeededRandom>,
    SystemClock,
>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    tracing::info!(url = config.database_url(), "database ready");

    // Services
    let clock = SystemClock;
    let notifier = Arc::new(LogNotifier::default());
    let random = Arc::new(match config.policy.pest_seed {
        Some(seed) => SeededRandom::seeded(seed),
        None => SeededRandom::from_entropy(),
    });

    let state: State = AppState {
        scheduler: Arc::new(MaintenanceScheduler::new(db.plants(), db.tasks(), clock)),
        growth: Arc::new(
            GrowthEngine::new(db.plants(), db.growth(), db.tasks(), clock)
                .with_policy(config.policy.growth()),
        ),
        health: Arc::new(
            HealthMonitor::new(db.plants(), db.growth(), db.tasks(), clock)
                .with_thresholds(config.policy.health()),
        ),
        pests: Arc::new(
            PestEngine::new(db.plants(), db.tasks(), Arc::clone(&notifier), random, clock)
                .with_policy(config.policy.pests()),
        ),
        reminders: Arc::new(ReminderService::new(
            db.growth(),
            db.tasks(),
            notifier,
            clock,
        )),
        cleanup: Arc::new(CleanupService::new(db.plants(), db.growth(), db.tasks())),
    };

    // Periodic passes
    let jobs = if config.jobs.enabled {
        start_jobs(&state, &config.jobs)
    } else {
        tracing::info!("periodic jobs disabled");
        Jobs::default()
    };

    // HTTP
    let app = verdant_adapter_http_axum::router::build(state);
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "verdantd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    jobs.shutdown();
    db.close().await;
    tracing::info!("verdantd stopped");

    Ok(())
}

fn start_jobs(state: &State, schedule: &JobsConfig) -> Jobs {
    let mut jobs = Jobs::default();

    let scheduler = Arc::clone(&state.scheduler);
    jobs.push(periodic("maintenance", schedule.maintenance_secs, move || {
        let scheduler = Arc::clone(&scheduler);
        async move {
            scheduler
                .run()
                .await
                .map(|s| format!("{} tasks created", s.tasks_created))
        }
    }));

    let growth = Arc::clone(&state.growth);
    jobs.push(periodic("growth", schedule.growth_secs, move || {
        let growth = Arc::clone(&growth);
        async move { growth.run().await.map(|summary| summary.to_string()) }
    }));

    let health = Arc::clone(&state.health);
    jobs.push(periodic("health", schedule.health_secs, move || {
        let health = Arc::clone(&health);
        async move {
            health
                .run()
                .await
                .map(|s| format!("{} of {} plants changed", s.changed, s.checked))
        }
    }));

    let pests = Arc::clone(&state.pests);
    jobs.push(periodic("pests", schedule.pests_secs, move || {
        let pests = Arc::clone(&pests);
        async move {
            pests
                .run()
                .await
                .map(|s| format!("{} new infestations", s.infestations))
        }
    }));

    let reminders = Arc::clone(&state.reminders);
    jobs.push(periodic("reminders", schedule.reminders_secs, move || {
        let reminders = Arc::clone(&reminders);
        async move {
            reminders
                .send_daily_reminders()
                .await
                .map(|s| format!("{} owners notified", s.owners_notified))
        }
    }));

    let cleanup = Arc::clone(&state.cleanup);
    jobs.push(periodic("cleanup", schedule.cleanup_secs, move || {
        let cleanup = Arc::clone(&cleanup);
        async move {
            cleanup
                .cleanup_orphans()
                .await
                .map(|s| {
                    format!(
                        "{} tasks and {} growth records deleted",
                        s.tasks_deleted, s.growth_deleted
                    )
                })
        }
    }));

    jobs
}

/// Run `pass` every `secs` seconds and log how it went.
fn periodic<F, Fut, S>(name: &'static str, secs: u64, mut pass: F) -> verdant_app::jobs::Job
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<S, VerdantError>> + Send + 'static,
    S: Display,
{
    spawn_periodic(name, Duration::from_secs(secs), move || {
        let run = pass();
        async move {
            match run.await {
                Ok(report) => tracing::info!(job = name, "{report}"),
                Err(err) if err.is_conflict() => {
                    tracing::warn!(job = name, error = %err, "concurrent update, retry next tick");
                }
                Err(err) => tracing::error!(job = name, error = %err, "pass failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
