//! Plant: the tracked living entity with its care configuration.

mod care;

pub use care::{CareSchedule, Neglect};

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, VerdantError};
use crate::id::{OwnerId, PlantId};
use crate::task::MaintenanceType;
use crate::time::Timestamp;

/// A plant owned by exactly one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub owner_id: OwnerId,
    pub name: String,
    pub species: Option<String>,
    pub watering: CareSchedule,
    pub fertilizing: CareSchedule,
    pub pruning: CareSchedule,
    pub auto_scheduling: bool,
    pub max_height: f64,
    pub growth_rate_per_week: f64,
    pub planted_at: Timestamp,
}

impl Plant {
    /// Create a builder for constructing a [`Plant`].
    #[must_use]
    pub fn builder() -> PlantBuilder {
        PlantBuilder::default()
    }

    /// Care schedule for a recurring type; `None` for [`MaintenanceType::PestControl`].
    #[must_use]
    pub fn care(&self, kind: MaintenanceType) -> Option<&CareSchedule> {
        match kind {
            MaintenanceType::Watering => Some(&self.watering),
            MaintenanceType::Fertilizing => Some(&self.fertilizing),
            MaintenanceType::Pruning => Some(&self.pruning),
            MaintenanceType::PestControl => None,
        }
    }

    /// When the next recurring task of `kind` becomes due.
    ///
    /// Uses `last_performed + frequency` when care has been recorded. Without
    /// a record, watering falls back to the planting date itself while
    /// fertilizing and pruning wait one full interval after planting.
    /// Returns `None` when no frequency is configured.
    #[must_use]
    pub fn next_due(&self, kind: MaintenanceType) -> Option<Timestamp> {
        let care = self.care(kind)?;
        let interval = care.interval()?;
        Some(match care.last_performed {
            Some(last) => last + interval,
            None if kind == MaintenanceType::Watering => self.planted_at,
            None => self.planted_at + interval,
        })
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::Validation`] when the name is empty, the max
    /// height is not positive, the growth rate is negative, or a configured
    /// frequency is zero.
    pub fn validate(&self) -> Result<(), VerdantError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.max_height.is_nan() || self.max_height <= 0.0 {
            return Err(ValidationError::NonPositiveMaxHeight(self.max_height).into());
        }
        if self.growth_rate_per_week.is_nan() || self.growth_rate_per_week < 0.0 {
            return Err(ValidationError::NegativeGrowthRate(self.growth_rate_per_week).into());
        }
        for kind in MaintenanceType::RECURRING {
            if self.care(kind).and_then(|c| c.frequency_days) == Some(0) {
                return Err(ValidationError::ZeroFrequency { care: kind.label() }.into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Plant`].
#[derive(Debug, Default)]
pub struct PlantBuilder {
    id: Option<PlantId>,
    owner_id: Option<OwnerId>,
    name: Option<String>,
    species: Option<String>,
    watering: CareSchedule,
    fertilizing: CareSchedule,
    pruning: CareSchedule,
    auto_scheduling: Option<bool>,
    max_height: Option<f64>,
    growth_rate_per_week: Option<f64>,
    planted_at: Option<Timestamp>,
}

impl PlantBuilder {
    #[must_use]
    pub fn id(mut self, id: PlantId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Set the care schedule for one recurring type. Pest control is ignored.
    #[must_use]
    pub fn care(mut self, kind: MaintenanceType, schedule: CareSchedule) -> Self {
        match kind {
            MaintenanceType::Watering => self.watering = schedule,
            MaintenanceType::Fertilizing => self.fertilizing = schedule,
            MaintenanceType::Pruning => self.pruning = schedule,
            MaintenanceType::PestControl => {}
        }
        self
    }

    #[must_use]
    pub fn auto_scheduling(mut self, enabled: bool) -> Self {
        self.auto_scheduling = Some(enabled);
        self
    }

    #[must_use]
    pub fn max_height(mut self, max_height: f64) -> Self {
        self.max_height = Some(max_height);
        self
    }

    #[must_use]
    pub fn growth_rate_per_week(mut self, rate: f64) -> Self {
        self.growth_rate_per_week = Some(rate);
        self
    }

    #[must_use]
    pub fn planted_at(mut self, ts: Timestamp) -> Self {
        self.planted_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Plant`].
    ///
    /// Defaults: random ids, auto-scheduling on, max height 100 cm, growth
    /// rate 5 % per week, planted now.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::Validation`] if invariants fail.
    pub fn build(self) -> Result<Plant, VerdantError> {
        let plant = Plant {
            id: self.id.unwrap_or_default(),
            owner_id: self.owner_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            species: self.species,
            watering: self.watering,
            fertilizing: self.fertilizing,
            pruning: self.pruning,
            auto_scheduling: self.auto_scheduling.unwrap_or(true),
            max_height: self.max_height.unwrap_or(100.0),
            growth_rate_per_week: self.growth_rate_per_week.unwrap_or(5.0),
            planted_at: self.planted_at.unwrap_or_else(crate::time::now),
        };
        plant.validate()?;
        Ok(plant)
    }
}
