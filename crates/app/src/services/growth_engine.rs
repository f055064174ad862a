//! Growth engine: "grow or wilt" for every auto-scheduled plant.
//!
//! Each tick, a plant either starts its growth history, grows by its weekly
//! rate, wilts from total neglect, or is left alone (dead, partially
//! neglected, updated too recently, or fully grown). The current growth record
//! is mutated in place and written back with a compare-and-swap on its
//! version.

use std::fmt;

use serde::Serialize;
use verdant_domain::error::VerdantError;
use verdant_domain::growth::{GrowthRecord, GrowthStage};
use verdant_domain::id::PlantId;
use verdant_domain::plant::{Neglect, Plant};
use verdant_domain::time::{Timestamp, calendar_days_between};

use super::{CONFLICT_MESSAGE, error_chain};
use crate::ports::{Clock, GrowthRepository, PlantFilter, PlantRepository, TaskRepository};

/// Tunables for the growth engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Minimum number of UTC calendar days between two growth updates.
    pub min_update_interval_days: i64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            min_update_interval_days: 5,
        }
    }
}

/// What happened to one plant during a growth pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthOutcome {
    pub plant_id: PlantId,
    pub plant_name: String,
    pub updated: bool,
    pub message: String,
    pub old_height: f64,
    pub new_height: f64,
    pub stage: Option<GrowthStage>,
}

impl GrowthOutcome {
    fn unchanged(plant: &Plant, record: &GrowthRecord, message: impl Into<String>) -> Self {
        Self {
            plant_id: plant.id,
            plant_name: plant.name.clone(),
            updated: false,
            message: message.into(),
            old_height: record.height,
            new_height: record.height,
            stage: Some(record.stage),
        }
    }

    fn failed(plant: &Plant, message: String) -> Self {
        Self {
            plant_id: plant.id,
            plant_name: plant.name.clone(),
            updated: false,
            message,
            old_height: 0.0,
            new_height: 0.0,
            stage: None,
        }
    }
}

/// Outcomes of one growth pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub processed: usize,
    pub updated: usize,
    pub outcomes: Vec<GrowthOutcome>,
}

impl GrowthSummary {
    fn push(&mut self, outcome: GrowthOutcome) {
        self.processed += 1;
        if outcome.updated {
            self.updated += 1;
        }
        self.outcomes.push(outcome);
    }
}

impl fmt::Display for GrowthSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Growth update summary")?;
        writeln!(f, "Total plants processed: {}", self.processed)?;
        writeln!(f, "Successfully updated: {}", self.updated)?;
        writeln!(f, "Skipped/No change: {}", self.processed - self.updated)?;
        writeln!(f)?;
        writeln!(f, "Details:")?;
        for outcome in &self.outcomes {
            let stage = outcome.stage.map_or("-", GrowthStage::label);
            writeln!(
                f,
                "- [{}] {}: {} (Height: {:.1} -> {:.1} cm, Stage: {})",
                outcome.plant_id,
                outcome.plant_name,
                outcome.message,
                outcome.old_height,
                outcome.new_height,
                stage
            )?;
        }
        Ok(())
    }
}

/// Advances height and stage of auto-scheduled plants.
pub struct GrowthEngine<P, G, T, C> {
    plants: P,
    growth: G,
    tasks: T,
    clock: C,
    policy: GrowthPolicy,
}

impl<P, G, T, C> GrowthEngine<P, G, T, C>
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
            policy: GrowthPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: GrowthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one growth pass over every auto-scheduled plant.
    ///
    /// # Errors
    ///
    /// Returns a storage error only when the plant list cannot be loaded;
    /// per-plant failures become outcomes prefixed with `"Error: "`.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<GrowthSummary, VerdantError> {
        let plants = self.plants.list_plants(PlantFilter::auto_scheduled()).await?;
        let mut summary = GrowthSummary::default();

        for plant in &plants {
            let outcome = match self.update_plant(plant).await {
                Ok(outcome) => outcome,
                Err(err) if err.is_conflict() => {
                    tracing::info!(plant_id = %plant.id, "growth record changed concurrently");
                    GrowthOutcome::failed(plant, CONFLICT_MESSAGE.to_string())
                }
                Err(err) => {
                    tracing::warn!(plant_id = %plant.id, error = %err, "failed to update growth");
                    GrowthOutcome::failed(plant, format!("Error: {}", error_chain(&err)))
                }
            };
            summary.push(outcome);
        }

        tracing::info!(
            processed = summary.processed,
            updated = summary.updated,
            "growth update completed"
        );
        Ok(summary)
    }

    /// Apply the growth rules to a single plant.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the repositories, or
    /// [`VerdantError::Conflict`] when the record changed since it was read.
    #[tracing::instrument(skip(self, plant), fields(plant_id = %plant.id))]
    pub async fn update_plant(&self, plant: &Plant) -> Result<GrowthOutcome, VerdantError> {
        let now = self.clock.now();

        let Some(mut record) = self.growth.find_current_growth(plant.id).await? else {
            let record = self.growth.insert_growth(GrowthRecord::initial(plant)).await?;
            tracing::info!("created initial growth record");
            return Ok(GrowthOutcome::unchanged(plant, &record, "Initial growth record created"));
        };

        if record.stage.is_terminal() {
            return Ok(GrowthOutcome::unchanged(plant, &record, "Plant is dead"));
        }

        match self.assess_neglect(plant, now).await? {
            Neglect::Total => {
                let old_height = record.height;
                record.wilt(now);
                let record = self.growth.update_growth(record).await?;
                tracing::info!("plant is wilting from neglect");
                return Ok(GrowthOutcome {
                    plant_id: plant.id,
                    plant_name: plant.name.clone(),
                    updated: true,
                    message: "Set to WILTING - all maintenance overdue".to_string(),
                    old_height,
                    new_height: record.height,
                    stage: Some(record.stage),
                });
            }
            Neglect::Partial => {
                return Ok(GrowthOutcome::unchanged(
                    plant,
                    &record,
                    "Skipped - maintenance overdue",
                ));
            }
            Neglect::None => {}
        }

        let elapsed_days = calendar_days_between(record.recorded_at, now);
        if elapsed_days < self.policy.min_update_interval_days {
            return Ok(GrowthOutcome::unchanged(
                plant,
                &record,
                format!(
                    "Update too soon (need at least {} days)",
                    self.policy.min_update_interval_days
                ),
            ));
        }

        if record.height >= plant.max_height {
            return Ok(GrowthOutcome::unchanged(plant, &record, "At maximum height"));
        }

        let progress = record.grow(plant, elapsed_days, now);
        let record = self.growth.update_growth(record).await?;

        let mut message = format!(
            "Updated successfully - grew {:.1} cm over {:.1} weeks ({:.1}% growth)",
            progress.increment(),
            progress.weeks,
            progress.rate_percent
        );
        if progress.stage_changed() {
            message.push_str(&format!(
                " - Stage: {} -> {}",
                progress.old_stage.label(),
                progress.new_stage.label()
            ));
        }
        tracing::info!(
            height = record.height,
            stage = %record.stage,
            "growth updated"
        );

        Ok(GrowthOutcome {
            plant_id: plant.id,
            plant_name: plant.name.clone(),
            updated: true,
            message,
            old_height: progress.old_height,
            new_height: progress.new_height,
            stage: Some(record.stage),
        })
    }

    async fn assess_neglect(&self, plant: &Plant, now: Timestamp) -> Result<Neglect, VerdantError> {
        let open = self.tasks.list_incomplete_tasks(Some(plant.id), None).await?;
        let has_past_due = open.iter().any(|task| task.is_past_due(now));
        Ok(Neglect::assess(plant, now, has_past_due))
    }
}
