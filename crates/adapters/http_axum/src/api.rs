//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod jobs;
#[allow(clippy::missing_errors_doc)]
pub mod pests;
#[allow(clippy::missing_errors_doc)]
pub mod plants;
#[allow(clippy::missing_errors_doc)]
pub mod reminders;

use axum::Router;
use axum::routing::{get, post};

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<P, G, T, N, R, C>() -> Router<AppState<P, G, T, N, R, C>>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        // Pass triggers
        .route(
            "/jobs/maintenance",
            post(jobs::maintenance::<P, G, T, N, R, C>),
        )
        .route("/jobs/growth", post(jobs::growth::<P, G, T, N, R, C>))
        .route("/jobs/health", post(jobs::health::<P, G, T, N, R, C>))
        .route("/jobs/pests", post(jobs::pests::<P, G, T, N, R, C>))
        .route(
            "/jobs/reminders",
            post(jobs::reminders::<P, G, T, N, R, C>),
        )
        .route("/jobs/cleanup", post(jobs::cleanup::<P, G, T, N, R, C>))
        .route(
            "/jobs/cleanup/{id}",
            post(jobs::cleanup_plant::<P, G, T, N, R, C>),
        )
        // Pests
        .route(
            "/pests/statistics",
            get(pests::statistics::<P, G, T, N, R, C>),
        )
        // Plants
        .route(
            "/plants/{id}/health-check",
            post(plants::health_check::<P, G, T, N, R, C>),
        )
        // Reminders
        .route("/reminders/today", get(reminders::today::<P, G, T, N, R, C>))
        .route("/reminders/send", post(reminders::send::<P, G, T, N, R, C>))
}
