//! Health monitor: decays plants whose maintenance has been neglected.

use serde::Serialize;
use verdant_domain::error::{NotFoundError, UnauthorizedError, VerdantError};
use verdant_domain::growth::GrowthStage;
use verdant_domain::health::{HealthThresholds, max_overdue_days};
use verdant_domain::id::{OwnerId, PlantId};
use verdant_domain::plant::Plant;

use super::{CONFLICT_MESSAGE, error_chain};
use crate::ports::{Clock, GrowthRepository, PlantFilter, PlantRepository, TaskRepository};

/// Health check result for one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthOutcome {
    pub plant_id: PlantId,
    pub plant_name: String,
    pub previous_stage: Option<GrowthStage>,
    pub current_stage: Option<GrowthStage>,
    pub max_overdue_days: i64,
    pub changed: bool,
    pub message: String,
}

/// Result of one health pass.
///
/// Every checked plant lands in exactly one of the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub checked: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    /// Lost a version race; retried on the next pass.
    pub conflicts: usize,
    pub failed: usize,
    pub outcomes: Vec<HealthOutcome>,
}

/// Moves plants to `Wilting` or `Dead` based on how long their open tasks
/// have been waiting.
pub struct HealthMonitor<P, G, T, C> {
    plants: P,
    growth: G,
    tasks: T,
    clock: C,
    thresholds: HealthThresholds,
}

impl<P, G, T, C> HealthMonitor<P, G, T, C>
where
    P: PlantRepository,
    G: GrowthRepository,
    T: TaskRepository,
    C: Clock,
{
    pub fn new(plants: P, growth: G, tasks: T, clock: C) -> Self {
        Self {
            plants,
            growth,
            tasks,
            clock,
            thresholds: HealthThresholds::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: HealthThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check every plant.
    ///
    /// # Errors
    ///
    /// Returns a storage error only when the plant list cannot be loaded.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<HealthSummary, VerdantError> {
        let plants = self.plants.list_plants(PlantFilter::all()).await?;
        let mut summary = HealthSummary::default();

        for plant in &plants {
            summary.checked += 1;
            match self.assess(plant).await {
                Ok(outcome) => {
                    if outcome.changed {
                        summary.changed += 1;
                    } else if outcome.current_stage.is_none_or(GrowthStage::is_terminal) {
                        summary.skipped += 1;
                    } else {
                        summary.unchanged += 1;
                    }
                    summary.outcomes.push(outcome);
                }
                Err(err) => {
                    let message = if err.is_conflict() {
                        tracing::info!(plant_id = %plant.id, "growth record changed concurrently");
                        summary.conflicts += 1;
                        CONFLICT_MESSAGE.to_string()
                    } else {
                        tracing::warn!(plant_id = %plant.id, error = %err, "health check failed");
                        summary.failed += 1;
                        format!("Error: {}", error_chain(&err))
                    };
                    summary.outcomes.push(HealthOutcome {
                        plant_id: plant.id,
                        plant_name: plant.name.clone(),
                        previous_stage: None,
                        current_stage: None,
                        max_overdue_days: 0,
                        changed: false,
                        message,
                    });
                }
            }
        }

        tracing::info!(
            checked = summary.checked,
            changed = summary.changed,
            conflicts = summary.conflicts,
            failed = summary.failed,
            "health monitoring completed"
        );
        Ok(summary)
    }

    /// Check one plant on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::NotFound`] for an unknown plant,
    /// [`VerdantError::Unauthorized`] when `owner_id` does not own it (nothing
    /// is changed), or a storage/conflict error from the update.
    #[tracing::instrument(skip(self))]
    pub async fn check_plant(
        &self,
        plant_id: PlantId,
        owner_id: OwnerId,
    ) -> Result<HealthOutcome, VerdantError> {
        let plant = self.plants.get_plant(plant_id).await?.ok_or_else(|| NotFoundError {
            entity: "Plant",
            id: plant_id.to_string(),
        })?;
        if plant.owner_id != owner_id {
            return Err(UnauthorizedError {
                entity: "Plant",
                id: plant_id.to_string(),
                owner: owner_id.to_string(),
            }
            .into());
        }
        self.assess(&plant).await
    }

    async fn assess(&self, plant: &Plant) -> Result<HealthOutcome, VerdantError> {
        let now = self.clock.now();
        let mut outcome = HealthOutcome {
            plant_id: plant.id,
            plant_name: plant.name.clone(),
            previous_stage: None,
            current_stage: None,
            max_overdue_days: 0,
            changed: false,
            message: String::new(),
        };

        let Some(mut record) = self.growth.find_current_growth(plant.id).await? else {
            outcome.message = "No growth record".to_string();
            return Ok(outcome);
        };
        outcome.previous_stage = Some(record.stage);
        outcome.current_stage = Some(record.stage);

        if record.stage.is_terminal() {
            outcome.message = "Plant is dead".to_string();
            return Ok(outcome);
        }

        let open = self.tasks.list_incomplete_tasks(Some(plant.id), None).await?;
        let overdue = max_overdue_days(&open, now);
        outcome.max_overdue_days = overdue;

        let Some(target) = self.thresholds.target_stage(record.stage, overdue) else {
            outcome.message = "No change".to_string();
            return Ok(outcome);
        };

        record.decay_to(target, overdue, now);
        outcome.message.clone_from(&record.notes);
        let record = self.growth.update_growth(record).await?;
        tracing::info!(
            plant_id = %plant.id,
            from = ?outcome.previous_stage,
            to = %record.stage,
            overdue_days = overdue,
            "plant health changed"
        );

        outcome.current_stage = Some(record.stage);
        outcome.changed = true;
        Ok(outcome)
    }
}
