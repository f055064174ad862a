//! Health assessment from overdue maintenance.

use serde::{Deserialize, Serialize};

use crate::growth::GrowthStage;
use crate::task::MaintenanceTask;
use crate::time::{Timestamp, whole_days_between};

/// Overdue-day thresholds that drive decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthThresholds {
    pub wilting_days: i64,
    pub dead_days: i64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            wilting_days: 3,
            dead_days: 7,
        }
    }
}

impl HealthThresholds {
    /// Stage the plant should move to, or `None` when it stays as is.
    ///
    /// Dead plants never change, and a plant already in the target stage
    /// reports no change.
    #[must_use]
    pub fn target_stage(&self, current: GrowthStage, max_overdue_days: i64) -> Option<GrowthStage> {
        if current.is_terminal() {
            return None;
        }
        let target = if max_overdue_days >= self.dead_days {
            GrowthStage::Dead
        } else if max_overdue_days >= self.wilting_days {
            GrowthStage::Wilting
        } else {
            return None;
        };
        (target != current).then_some(target)
    }
}

/// Largest number of whole days any incomplete task is past its scheduled
/// date. Tasks not yet past due contribute nothing.
#[must_use]
pub fn max_overdue_days<'a>(tasks: impl IntoIterator<Item = &'a MaintenanceTask>, now: Timestamp) -> i64 {
    tasks
        .into_iter()
        .filter(|task| !task.completed)
        .map(|task| whole_days_between(task.scheduled_date, now))
        .filter(|days| *days > 0)
        .max()
        .unwrap_or(0)
}
