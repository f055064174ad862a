//! Per-plant actions.

use axum::Json;
use axum::extract::{Path, State};

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};
use verdant_app::services::HealthOutcome;

use crate::error::ApiError;
use crate::extract::{Owner, plant_id};
use crate::state::AppState;

/// `POST /api/plants/:id/health-check`
///
/// Re-evaluates one plant's health on behalf of its owner.
pub async fn health_check<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<Json<HealthOutcome>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let plant_id = plant_id(&id)?;
    let outcome = state.health.check_plant(plant_id, owner_id).await?;
    Ok(Json(outcome))
}
