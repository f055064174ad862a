//! Maintenance scheduler: creates recurring care tasks when they fall due.

use serde::Serialize;
use verdant_domain::error::VerdantError;
use verdant_domain::plant::Plant;
use verdant_domain::task::{MaintenanceTask, MaintenanceType};
use verdant_domain::time::{DayWindow, Timestamp};

use super::PlantFailure;
use crate::ports::{Clock, PlantFilter, PlantRepository, TaskRepository};

/// Result of one scheduler pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerSummary {
    pub plants_processed: usize,
    pub tasks_created: usize,
    pub failures: Vec<PlantFailure>,
}

/// Creates watering, fertilizing and pruning tasks for auto-scheduled plants.
///
/// A task is created at most once per plant, type and UTC day, and never
/// while an earlier auto-generated task of the same type is still open.
pub struct MaintenanceScheduler<P, T, C> {
    plants: P,
    tasks: T,
    clock: C,
}

impl<P, T, C> MaintenanceScheduler<P, T, C>
where
    P: PlantRepository,
    T: TaskRepository,
    C: Clock,
{
    pub fn new(plants: P, tasks: T, clock: C) -> Self {
        Self { plants, tasks, clock }
    }

    /// Run one pass over every auto-scheduled plant.
    ///
    /// # Errors
    ///
    /// Returns a storage error only when the plant list cannot be loaded;
    /// per-plant failures are collected in the summary.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<SchedulerSummary, VerdantError> {
        let now = self.clock.now();
        let plants = self.plants.list_plants(PlantFilter::auto_scheduled()).await?;
        let mut summary = SchedulerSummary::default();

        for plant in &plants {
            summary.plants_processed += 1;
            match self.schedule_plant(plant, now).await {
                Ok(created) => summary.tasks_created += created,
                Err(err) => {
                    tracing::warn!(plant_id = %plant.id, error = %err, "failed to schedule maintenance");
                    summary.failures.push(PlantFailure::new(plant.id, &err));
                }
            }
        }

        tracing::info!(
            plants = summary.plants_processed,
            created = summary.tasks_created,
            failed = summary.failures.len(),
            "maintenance scheduling completed"
        );
        Ok(summary)
    }

    async fn schedule_plant(&self, plant: &Plant, now: Timestamp) -> Result<usize, VerdantError> {
        let today = DayWindow::containing(now);
        let mut created = 0;

        for kind in MaintenanceType::RECURRING {
            let Some(next_due) = plant.next_due(kind) else {
                continue;
            };
            if now < next_due {
                continue;
            }
            if self
                .tasks
                .exists_task_scheduled_between(plant.id, kind, today.start, today.end)
                .await?
            {
                tracing::debug!(plant_id = %plant.id, task_type = %kind, "task already scheduled today");
                continue;
            }
            if self.tasks.exists_active_task(plant.id, kind).await? {
                tracing::debug!(plant_id = %plant.id, task_type = %kind, "open task already exists");
                continue;
            }

            let task = MaintenanceTask::builder(plant.id, plant.owner_id, kind, now)
                .due_date(now)
                .auto_generated(true)
                .notes(format!("Auto-generated {} task for {}", kind.label(), plant.name))
                .created_at(now)
                .build();
            self.tasks.insert_task(task).await?;
            tracing::debug!(plant_id = %plant.id, task_type = %kind, "created maintenance task");
            created += 1;
        }

        Ok(created)
    }
}
