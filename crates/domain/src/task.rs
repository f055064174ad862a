//! Maintenance task: a scheduled or ad hoc unit of care work.

mod maintenance_type;

pub use maintenance_type::MaintenanceType;

use serde::{Deserialize, Serialize};

use crate::id::{OwnerId, PlantId, TaskId};
use crate::time::{DayWindow, Timestamp};

/// A unit of care work attached to one plant and one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: TaskId,
    pub plant_id: PlantId,
    pub owner_id: OwnerId,
    pub task_type: MaintenanceType,
    pub scheduled_date: Timestamp,
    pub due_date: Option<Timestamp>,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub auto_generated: bool,
    pub notes: String,
    pub created_at: Timestamp,
}

impl MaintenanceTask {
    /// Create a builder for constructing a [`MaintenanceTask`].
    #[must_use]
    pub fn builder(
        plant_id: PlantId,
        owner_id: OwnerId,
        task_type: MaintenanceType,
        scheduled_date: Timestamp,
    ) -> MaintenanceTaskBuilder {
        MaintenanceTaskBuilder {
            id: None,
            plant_id,
            owner_id,
            task_type,
            scheduled_date,
            due_date: None,
            completed_at: None,
            auto_generated: false,
            notes: String::new(),
            created_at: None,
        }
    }

    /// Incomplete and its due date lies inside `day`.
    #[must_use]
    pub fn is_due_within(&self, day: &DayWindow) -> bool {
        !self.completed && self.due_date.is_some_and(|due| day.contains(due))
    }

    /// Incomplete and its due date is strictly before `now`.
    #[must_use]
    pub fn is_past_due(&self, now: Timestamp) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Step-by-step builder for [`MaintenanceTask`].
#[derive(Debug)]
pub struct MaintenanceTaskBuilder {
    id: Option<TaskId>,
    plant_id: PlantId,
    owner_id: OwnerId,
    task_type: MaintenanceType,
    scheduled_date: Timestamp,
    due_date: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    auto_generated: bool,
    notes: String,
    created_at: Option<Timestamp>,
}

impl MaintenanceTaskBuilder {
    #[must_use]
    pub fn id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due: Timestamp) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Mark the task as completed at the given time.
    #[must_use]
    pub fn completed_at(mut self, at: Timestamp) -> Self {
        self.completed_at = Some(at);
        self
    }

    #[must_use]
    pub fn auto_generated(mut self, auto_generated: bool) -> Self {
        self.auto_generated = auto_generated;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Consume the builder and return the task.
    ///
    /// `created_at` defaults to the scheduled date.
    #[must_use]
    pub fn build(self) -> MaintenanceTask {
        MaintenanceTask {
            id: self.id.unwrap_or_default(),
            plant_id: self.plant_id,
            owner_id: self.owner_id,
            task_type: self.task_type,
            scheduled_date: self.scheduled_date,
            due_date: self.due_date,
            completed: self.completed_at.is_some(),
            completed_at: self.completed_at,
            auto_generated: self.auto_generated,
            notes: self.notes,
            created_at: self.created_at.unwrap_or(self.scheduled_date),
        }
    }
}
