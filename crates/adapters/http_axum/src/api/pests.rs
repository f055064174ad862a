//! Pest statistics.

use axum::Json;
use axum::extract::State;

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};
use verdant_app::services::PestStatistics;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/pests/statistics`
pub async fn statistics<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
) -> Result<Json<PestStatistics>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let stats = state.pests.statistics().await?;
    Ok(Json(stats))
}
