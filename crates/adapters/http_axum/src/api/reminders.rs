//! Owner-facing reminder queries.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};
use verdant_domain::id::OwnerId;

use crate::error::ApiError;
use crate::extract::Owner;
use crate::state::AppState;

/// Reminder overview for one owner.
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub owner_id: OwnerId,
    pub has_tasks_due_today: bool,
    pub tasks_due_today: usize,
    pub overdue_tasks: u64,
}

/// Result of an on-demand reminder.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub owner_id: OwnerId,
    pub tasks_sent: usize,
}

/// `GET /api/reminders/today`
pub async fn today<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
    Owner(owner_id): Owner,
) -> Result<Json<TodayResponse>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks_due_today = state.reminders.tasks_due_today_count(owner_id).await?;
    let overdue_tasks = state.reminders.overdue_task_count(owner_id).await?;
    Ok(Json(TodayResponse {
        owner_id,
        has_tasks_due_today: tasks_due_today > 0,
        tasks_due_today,
        overdue_tasks,
    }))
}

/// `POST /api/reminders/send`
pub async fn send<P, G, T, N, R, C>(
    State(state): State<AppState<P, G, T, N, R, C>>,
    Owner(owner_id): Owner,
) -> Result<Json<SendResponse>, ApiError>
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks_sent = state.reminders.send_for_owner(owner_id).await?;
    Ok(Json(SendResponse {
        owner_id,
        tasks_sent,
    }))
}
