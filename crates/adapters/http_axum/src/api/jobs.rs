//! Manual triggers for the lifecycle passes.
//!
//! Each endpoint runs one pass synchronously and returns its summary.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};
use verdant_app::services::{
    CleanupSummary, GrowthSummary, HealthSummary, ReminderSummary, SchedulerSummary,
};

use crate::error::ApiError;
use crate::extract::plant_id;
use crate::state::AppState;

/// Response of the pest trigger.
#[derive(Debug, Serialize)]
pub struct PestTriggerResponse {
    pub message: String,
}

/// `POST /api/jobs/maintenance`
pub async fn maintenance<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<SchedulerSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.scheduler.run().await?;
    Ok(Json(summary))
}

/// `POST /api/jobs/growth`
pub async fn growth<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<GrowthSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.growth.run().await?;
    Ok(Json(summary))
}

/// `POST /api/jobs/health`
pub async fn health<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<HealthSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.health.run().await?;
    Ok(Json(summary))
}

/// `POST /api/jobs/pests`
pub async fn pests<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<PestTriggerResponse>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let message = state.pests.trigger_manually().await?;
    Ok(Json(PestTriggerResponse { message }))
}

/// `POST /api/jobs/reminders`
pub async fn reminders<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<ReminderSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.reminders.send_daily_reminders().await?;
    Ok(Json(summary))
}

/// `POST /api/jobs/cleanup`
pub async fn cleanup<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<CleanupSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.cleanup.cleanup_orphans().await?;
    Ok(Json(summary))
}

/// `POST /api/jobs/cleanup/:id`
///
/// Removes the records of one deleted plant; a live plant is left alone.
pub async fn cleanup_plant<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
    Path(id): Path<String>,
) -> Result<Json<CleanupSummary>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let plant_id = plant_id(&id)?;
    let summary = state.cleanup.cleanup_plant(plant_id).await?;
    Ok(Json(summary))
}
