//! Growth records: height and lifecycle stage snapshots of a plant.

mod stage;

pub use stage::GrowthStage;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, VerdantError};
use crate::id::{GrowthRecordId, OwnerId, PlantId};
use crate::plant::Plant;
use crate::time::Timestamp;

/// Note attached to the first record of every plant.
pub const INITIAL_NOTE: &str = "Initial growth record";

/// Note attached when neglect forces a plant into [`GrowthStage::Wilting`].
pub const WILTING_NOTE: &str = "Plant is wilting due to neglected maintenance tasks";

/// One growth snapshot. The record with the latest `recorded_at` is the
/// plant's current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: GrowthRecordId,
    pub plant_id: PlantId,
    pub owner_id: OwnerId,
    pub height: f64,
    pub stage: GrowthStage,
    pub recorded_at: Timestamp,
    pub growth_since_last: f64,
    pub notes: String,
    pub color_changes: bool,
    /// Bumped by the store on every persisted update.
    pub version: u64,
}

/// Height change applied by [`GrowthRecord::grow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthProgress {
    pub old_height: f64,
    pub new_height: f64,
    pub old_stage: GrowthStage,
    pub new_stage: GrowthStage,
    pub weeks: f64,
    /// Percentage of max height the plant was allowed to grow over `weeks`.
    pub rate_percent: f64,
}

impl GrowthProgress {
    /// Height actually gained, after clamping at max height.
    #[must_use]
    pub fn increment(&self) -> f64 {
        self.new_height - self.old_height
    }

    #[must_use]
    pub fn stage_changed(&self) -> bool {
        self.old_stage != self.new_stage
    }
}

impl GrowthRecord {
    /// Create a builder for constructing a [`GrowthRecord`].
    #[must_use]
    pub fn builder(plant_id: PlantId, owner_id: OwnerId, recorded_at: Timestamp) -> GrowthRecordBuilder {
        GrowthRecordBuilder {
            id: None,
            plant_id,
            owner_id,
            height: 0.0,
            stage: GrowthStage::Seed,
            recorded_at,
            growth_since_last: 0.0,
            notes: String::new(),
            color_changes: false,
            version: 0,
        }
    }

    /// The first record of a plant: a seed at height zero, dated at planting.
    #[must_use]
    pub fn initial(plant: &Plant) -> Self {
        Self::builder(plant.id, plant.owner_id, plant.planted_at)
            .notes(INITIAL_NOTE)
            .build()
    }

    /// Check the height against the plant's bounds.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::Validation`] when the height is negative or
    /// above `max_height`.
    pub fn validate(&self, max_height: f64) -> Result<(), VerdantError> {
        if !(0.0..=max_height).contains(&self.height) {
            return Err(ValidationError::HeightOutOfRange {
                height: self.height,
                max_height,
            }
            .into());
        }
        Ok(())
    }

    /// Grow by the plant's weekly rate over `elapsed_days`, clamped to
    /// `max_height`, and re-evaluate the stage.
    ///
    /// The record is mutated in place; callers gate on cadence and neglect.
    pub fn grow(&mut self, plant: &Plant, elapsed_days: i64, now: Timestamp) -> GrowthProgress {
        #[allow(clippy::cast_precision_loss)]
        let weeks = elapsed_days as f64 / 7.0;
        let rate_percent = plant.growth_rate_per_week * weeks;
        let increment = rate_percent / 100.0 * plant.max_height;

        let old_height = self.height;
        let old_stage = self.stage;
        let new_height = (old_height + increment).min(plant.max_height);
        let new_stage = old_stage.advance(new_height, plant.max_height);

        let progress = GrowthProgress {
            old_height,
            new_height,
            old_stage,
            new_stage,
            weeks,
            rate_percent,
        };

        self.height = new_height;
        self.stage = new_stage;
        self.recorded_at = now;
        self.growth_since_last = progress.increment();
        self.notes = if progress.stage_changed() {
            format!("Stage changed from {} to {}", old_stage.label(), new_stage.label())
        } else {
            format!(
                "Grew {:.1} cm over {:.1} weeks ({:.1}% of max height)",
                progress.increment(),
                weeks,
                rate_percent
            )
        };

        progress
    }

    /// Force the record into [`GrowthStage::Wilting`] after total neglect.
    pub fn wilt(&mut self, now: Timestamp) {
        self.stage = GrowthStage::Wilting;
        self.color_changes = true;
        self.recorded_at = now;
        self.growth_since_last = 0.0;
        self.notes = WILTING_NOTE.to_string();
    }

    /// Move to a decay stage picked by the health assessment, keeping height.
    pub fn decay_to(&mut self, stage: GrowthStage, overdue_days: i64, now: Timestamp) {
        self.notes = format!(
            "Auto-updated from {} to {} due to {} days of overdue maintenance",
            self.stage.label(),
            stage.label(),
            overdue_days
        );
        self.stage = stage;
        self.recorded_at = now;
        self.growth_since_last = 0.0;
    }
}

/// Builder for [`GrowthRecord`].
#[derive(Debug, Clone)]
pub struct GrowthRecordBuilder {
    id: Option<GrowthRecordId>,
    plant_id: PlantId,
    owner_id: OwnerId,
    height: f64,
    stage: GrowthStage,
    recorded_at: Timestamp,
    growth_since_last: f64,
    notes: String,
    color_changes: bool,
    version: u64,
}

impl GrowthRecordBuilder {
    #[must_use]
    pub fn id(mut self, id: GrowthRecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn stage(mut self, stage: GrowthStage) -> Self {
        self.stage = stage;
        self
    }

    #[must_use]
    pub fn growth_since_last(mut self, growth: f64) -> Self {
        self.growth_since_last = growth;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn color_changes(mut self, color_changes: bool) -> Self {
        self.color_changes = color_changes;
        self
    }

    #[must_use]
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn build(self) -> GrowthRecord {
        GrowthRecord {
            id: self.id.unwrap_or_default(),
            plant_id: self.plant_id,
            owner_id: self.owner_id,
            height: self.height,
            stage: self.stage,
            recorded_at: self.recorded_at,
            growth_since_last: self.growth_since_last,
            notes: self.notes,
            color_changes: self.color_changes,
            version: self.version,
        }
    }
}
