//! Storage port: repository traits for plants, growth records and tasks.

use std::future::Future;
use std::sync::Arc;

use verdant_domain::error::VerdantError;
use verdant_domain::growth::GrowthRecord;
use verdant_domain::id::{GrowthRecordId, OwnerId, PlantId, TaskId};
use verdant_domain::plant::Plant;
use verdant_domain::task::{MaintenanceTask, MaintenanceType};
use verdant_domain::time::Timestamp;

/// Selection criteria for [`PlantRepository::list_plants`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlantFilter {
    pub owner_id: Option<OwnerId>,
    pub auto_scheduling: Option<bool>,
}

impl PlantFilter {
    /// Every plant.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Plants that opted into automatic scheduling.
    #[must_use]
    pub fn auto_scheduled() -> Self {
        Self {
            auto_scheduling: Some(true),
            ..Self::default()
        }
    }

    /// Plants belonging to `owner_id`.
    #[must_use]
    pub fn owned_by(owner_id: OwnerId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// Whether `plant` passes this filter.
    #[must_use]
    pub fn matches(&self, plant: &Plant) -> bool {
        self.owner_id.is_none_or(|owner| plant.owner_id == owner)
            && self
                .auto_scheduling
                .is_none_or(|enabled| plant.auto_scheduling == enabled)
    }
}

/// Read access to plants. Plants are created and destroyed elsewhere.
pub trait PlantRepository {
    /// List plants matching `filter`.
    fn list_plants(
        &self,
        filter: PlantFilter,
    ) -> impl Future<Output = Result<Vec<Plant>, VerdantError>> + Send;

    /// Get a plant by its unique identifier.
    fn get_plant(
        &self,
        id: PlantId,
    ) -> impl Future<Output = Result<Option<Plant>, VerdantError>> + Send;

    /// Whether a plant with `id` exists.
    fn plant_exists(&self, id: PlantId) -> impl Future<Output = Result<bool, VerdantError>> + Send;
}

/// Persistence for [`GrowthRecord`]s.
pub trait GrowthRepository {
    /// The plant's current record: the one with the latest `recorded_at`.
    fn find_current_growth(
        &self,
        plant_id: PlantId,
    ) -> impl Future<Output = Result<Option<GrowthRecord>, VerdantError>> + Send;

    /// Store a new record.
    fn insert_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send;

    /// Overwrite an existing record when its stored version still equals
    /// `record.version`. The returned record carries the bumped version.
    ///
    /// Fails with [`VerdantError::Conflict`] when another writer got there
    /// first.
    fn update_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send;

    /// Every stored record.
    fn list_all_growth(&self) -> impl Future<Output = Result<Vec<GrowthRecord>, VerdantError>> + Send;

    /// Delete a record by id.
    fn delete_growth(
        &self,
        id: GrowthRecordId,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send;
}

/// Persistence for [`MaintenanceTask`]s.
pub trait TaskRepository {
    /// Incomplete tasks, optionally narrowed to one plant and/or one owner.
    fn list_incomplete_tasks(
        &self,
        plant_id: Option<PlantId>,
        owner_id: Option<OwnerId>,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send;

    /// Whether an incomplete auto-generated task of `task_type` exists for the plant.
    fn exists_active_task(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send;

    /// Whether any task of `task_type` for the plant is scheduled in `[start, end)`.
    fn exists_task_scheduled_between(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send;

    /// Store a new task.
    fn insert_task(
        &self,
        task: MaintenanceTask,
    ) -> impl Future<Output = Result<MaintenanceTask, VerdantError>> + Send;

    /// Number of the owner's incomplete tasks whose due date is before `now`.
    fn count_overdue_tasks(
        &self,
        owner_id: OwnerId,
        now: Timestamp,
    ) -> impl Future<Output = Result<u64, VerdantError>> + Send;

    /// Every task of `task_type`, complete or not.
    fn list_tasks_by_type(
        &self,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send;

    /// Every stored task.
    fn list_all_tasks(&self) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send;

    /// Delete a task by id.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), VerdantError>> + Send;
}

impl<T: PlantRepository + Send + Sync> PlantRepository for Arc<T> {
    fn list_plants(
        &self,
        filter: PlantFilter,
    ) -> impl Future<Output = Result<Vec<Plant>, VerdantError>> + Send {
        (**self).list_plants(filter)
    }

    fn get_plant(
        &self,
        id: PlantId,
    ) -> impl Future<Output = Result<Option<Plant>, VerdantError>> + Send {
        (**self).get_plant(id)
    }

    fn plant_exists(&self, id: PlantId) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        (**self).plant_exists(id)
    }
}

impl<T: GrowthRepository + Send + Sync> GrowthRepository for Arc<T> {
    fn find_current_growth(
        &self,
        plant_id: PlantId,
    ) -> impl Future<Output = Result<Option<GrowthRecord>, VerdantError>> + Send {
        (**self).find_current_growth(plant_id)
    }

    fn insert_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send {
        (**self).insert_growth(record)
    }

    fn update_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send {
        (**self).update_growth(record)
    }

    fn list_all_growth(&self) -> impl Future<Output = Result<Vec<GrowthRecord>, VerdantError>> + Send {
        (**self).list_all_growth()
    }

    fn delete_growth(
        &self,
        id: GrowthRecordId,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        (**self).delete_growth(id)
    }
}

impl<T: TaskRepository + Send + Sync> TaskRepository for Arc<T> {
    fn list_incomplete_tasks(
        &self,
        plant_id: Option<PlantId>,
        owner_id: Option<OwnerId>,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        (**self).list_incomplete_tasks(plant_id, owner_id)
    }

    fn exists_active_task(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        (**self).exists_active_task(plant_id, task_type)
    }

    fn exists_task_scheduled_between(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        (**self).exists_task_scheduled_between(plant_id, task_type, start, end)
    }

    fn insert_task(
        &self,
        task: MaintenanceTask,
    ) -> impl Future<Output = Result<MaintenanceTask, VerdantError>> + Send {
        (**self).insert_task(task)
    }

    fn count_overdue_tasks(
        &self,
        owner_id: OwnerId,
        now: Timestamp,
    ) -> impl Future<Output = Result<u64, VerdantError>> + Send {
        (**self).count_overdue_tasks(owner_id, now)
    }

    fn list_tasks_by_type(
        &self,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        (**self).list_tasks_by_type(task_type)
    }

    fn list_all_tasks(&self) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        (**self).list_all_tasks()
    }

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), VerdantError>> + Send {
        (**self).delete_task(id)
    }
}

