//! Pest engine: random infestations that turn into pest-control tasks.

use chrono::Duration;
use serde::Serialize;
use verdant_domain::error::VerdantError;
use verdant_domain::plant::Plant;
use verdant_domain::task::{MaintenanceTask, MaintenanceType};
use verdant_domain::time::Timestamp;

use super::PlantFailure;
use crate::ports::{Clock, Notifier, PlantFilter, PlantRepository, RandomSource, TaskRepository};

/// Tunables for the pest engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PestPolicy {
    /// Chance in `[0, 1]` that a plant without an open pest task gets infested.
    pub probability: f64,
    /// Days the owner gets to treat an infestation.
    pub treatment_window_days: i64,
}

impl Default for PestPolicy {
    fn default() -> Self {
        Self {
            probability: 0.30,
            treatment_window_days: 3,
        }
    }
}

/// Result of one infestation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PestRunSummary {
    pub plants_checked: usize,
    pub infestations: usize,
    pub already_treated: usize,
    pub failures: Vec<PlantFailure>,
}

/// Counts over every pest-control task ever created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PestStatistics {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Rolls for infestations and opens pest-control tasks.
pub struct PestEngine<P, T, N, R, C> {
    plants: P,
    tasks: T,
    notifier: N,
    random: R,
    clock: C,
    policy: PestPolicy,
}

impl<P, T, N, R, C> PestEngine<P, T, N, R, C>
where
    P: PlantRepository,
    T: TaskRepository,
    N: Notifier,
    R: RandomSource,
    C: Clock,
{
    pub fn new(plants: P, tasks: T, notifier: N, random: R, clock: C) -> Self {
        Self {
            plants,
            tasks,
            notifier,
            random,
            clock,
            policy: PestPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Roll once for every plant that has no open pest-control task.
    ///
    /// # Errors
    ///
    /// Returns a storage error only when the plant list cannot be loaded.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<PestRunSummary, VerdantError> {
        let now = self.clock.now();
        let plants = self.plants.list_plants(PlantFilter::all()).await?;
        let mut summary = PestRunSummary::default();

        for plant in &plants {
            summary.plants_checked += 1;
            match self.check_plant(plant, now).await {
                Ok(Infestation::Created) => summary.infestations += 1,
                Ok(Infestation::AlreadyTreated) => summary.already_treated += 1,
                Ok(Infestation::Spared) => {}
                Err(err) => {
                    tracing::warn!(plant_id = %plant.id, error = %err, "pest check failed");
                    summary.failures.push(PlantFailure::new(plant.id, &err));
                }
            }
        }

        tracing::info!(
            infestations = summary.infestations,
            plants = summary.plants_checked,
            "pest infestation check completed"
        );
        Ok(summary)
    }

    /// Run a pass on demand and describe the result.
    ///
    /// # Errors
    ///
    /// Same as [`PestEngine::run`].
    pub async fn trigger_manually(&self) -> Result<String, VerdantError> {
        tracing::info!("manual pest check triggered");
        let summary = self.run().await?;
        Ok(format!(
            "Pest infestation check completed. {} new infestations detected out of {} plants.",
            summary.infestations, summary.plants_checked
        ))
    }

    /// Totals over all pest-control tasks.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the task repository.
    pub async fn statistics(&self) -> Result<PestStatistics, VerdantError> {
        let tasks = self.tasks.list_tasks_by_type(MaintenanceType::PestControl).await?;
        let completed = tasks.iter().filter(|task| task.completed).count();
        Ok(PestStatistics {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        })
    }

    async fn check_plant(&self, plant: &Plant, now: Timestamp) -> Result<Infestation, VerdantError> {
        let open = self.tasks.list_incomplete_tasks(Some(plant.id), None).await?;
        if open.iter().any(|task| task.task_type == MaintenanceType::PestControl) {
            return Ok(Infestation::AlreadyTreated);
        }

        if self.random.next_uniform() >= self.policy.probability {
            return Ok(Infestation::Spared);
        }

        let task = MaintenanceTask::builder(plant.id, plant.owner_id, MaintenanceType::PestControl, now)
            .due_date(now + Duration::days(self.policy.treatment_window_days))
            .auto_generated(true)
            .notes(format!("Treat {} with pesticide", plant.name))
            .created_at(now)
            .build();
        self.tasks.insert_task(task).await?;
        tracing::info!(plant_id = %plant.id, plant_name = %plant.name, "pest infestation detected");

        if let Err(err) = self.notifier.send_pest_alert(plant.owner_id, plant).await {
            tracing::warn!(plant_id = %plant.id, error = %err, "failed to send pest alert");
        }
        Ok(Infestation::Created)
    }
}

enum Infestation {
    Created,
    AlreadyTreated,
    Spared,
}
