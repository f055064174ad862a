//! Care schedules and the neglect assessment derived from them.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::plant::Plant;
use crate::task::MaintenanceType;
use crate::time::Timestamp;

/// Recurring care configuration for one maintenance type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareSchedule {
    pub frequency_days: Option<u32>,
    pub last_performed: Option<Timestamp>,
}

impl CareSchedule {
    /// Care every `days` days, never performed yet.
    #[must_use]
    pub fn every(days: u32) -> Self {
        Self {
            frequency_days: Some(days),
            last_performed: None,
        }
    }

    /// Record when this care was last performed.
    #[must_use]
    pub fn performed_at(mut self, ts: Timestamp) -> Self {
        self.last_performed = Some(ts);
        self
    }

    /// The configured frequency as a duration.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.frequency_days.map(|days| Duration::days(i64::from(days)))
    }

    /// Tracked for neglect purposes: both a frequency and a last-performed
    /// date are known.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.frequency_days.is_some() && self.last_performed.is_some()
    }

    /// Tracked and `last_performed + frequency` is strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        match (self.last_performed, self.interval()) {
            (Some(last), Some(interval)) => now > last + interval,
            _ => false,
        }
    }
}

/// How badly a plant's maintenance has been neglected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neglect {
    /// Nothing overdue.
    None,
    /// Something is overdue, but not every tracked care type.
    Partial,
    /// Every tracked care type is overdue (at least one is tracked).
    Total,
}

impl Neglect {
    /// Assess neglect for `plant` at `now`.
    ///
    /// `has_past_due_tasks` reports whether the plant has any incomplete task
    /// whose due date has passed; such a task counts as partial neglect on its
    /// own but never makes neglect total.
    #[must_use]
    pub fn assess(plant: &Plant, now: Timestamp, has_past_due_tasks: bool) -> Self {
        let tracked: Vec<&CareSchedule> = MaintenanceType::RECURRING
            .into_iter()
            .filter_map(|kind| plant.care(kind))
            .filter(|care| care.is_tracked())
            .collect();

        let overdue = tracked.iter().filter(|care| care.is_overdue(now)).count();

        if !tracked.is_empty() && overdue == tracked.len() {
            Self::Total
        } else if overdue > 0 || has_past_due_tasks {
            Self::Partial
        } else {
            Self::None
        }
    }
}
