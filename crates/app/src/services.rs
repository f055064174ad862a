//! Application services: the lifecycle passes.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Batch passes process one plant at a time and record per-plant failures
//! instead of aborting.

pub mod cleanup_service;
pub mod growth_engine;
pub mod health_monitor;
pub mod maintenance_scheduler;
pub mod pest_engine;
pub mod reminder_service;

pub use cleanup_service::{CleanupService, CleanupSummary};
pub use growth_engine::{GrowthEngine, GrowthOutcome, GrowthPolicy, GrowthSummary};
pub use health_monitor::{HealthMonitor, HealthOutcome, HealthSummary};
pub use maintenance_scheduler::{MaintenanceScheduler, SchedulerSummary};
pub use pest_engine::{PestEngine, PestPolicy, PestRunSummary, PestStatistics};
pub use reminder_service::{ReminderService, ReminderSummary};

use std::error::Error as StdError;

use serde::Serialize;
use verdant_domain::id::PlantId;

/// A plant a batch pass failed to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantFailure {
    pub plant_id: PlantId,
    pub error: String,
}

impl PlantFailure {
    pub(crate) fn new(plant_id: PlantId, err: &(dyn StdError + 'static)) -> Self {
        Self {
            plant_id,
            error: error_chain(err),
        }
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Message recorded when a compare-and-swap update loses a race.
pub(crate) const CONFLICT_MESSAGE: &str = "Concurrent update detected, retrying next tick";
