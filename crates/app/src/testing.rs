//! In-memory port implementations shared by the service tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use verdant_domain::error::{BoxedError, ConflictError, VerdantError};
use verdant_domain::growth::GrowthRecord;
use verdant_domain::id::{GrowthRecordId, OwnerId, PlantId, TaskId};
use verdant_domain::plant::Plant;
use verdant_domain::task::{MaintenanceTask, MaintenanceType};
use verdant_domain::time::Timestamp;

use crate::ports::{GrowthRepository, Notifier, PlantFilter, PlantRepository, RandomSource, TaskRepository};

pub fn noon(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn storage_failure(what: &str) -> VerdantError {
    let err: BoxedError = Box::new(std::io::Error::other(what.to_string()));
    VerdantError::Storage(err)
}

// ── In-memory store ────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStore {
    plants: Mutex<HashMap<PlantId, Plant>>,
    growth: Mutex<HashMap<GrowthRecordId, GrowthRecord>>,
    tasks: Mutex<HashMap<TaskId, MaintenanceTask>>,
    failing: Mutex<HashSet<PlantId>>,
    failing_deletes: Mutex<HashSet<PlantId>>,
    racing: Mutex<HashSet<GrowthRecordId>>,
}

impl InMemoryStore {
    pub fn add_plant(&self, plant: Plant) {
        self.plants.lock().unwrap().insert(plant.id, plant);
    }

    pub fn remove_plant(&self, id: PlantId) {
        self.plants.lock().unwrap().remove(&id);
    }

    pub fn add_growth(&self, record: GrowthRecord) {
        self.growth.lock().unwrap().insert(record.id, record);
    }

    pub fn add_task(&self, task: MaintenanceTask) {
        self.tasks.lock().unwrap().insert(task.id, task);
    }

    /// Every growth or task operation touching `plant_id` fails.
    pub fn fail_for(&self, plant_id: PlantId) {
        self.failing.lock().unwrap().insert(plant_id);
    }

    /// Deleting records of `plant_id` fails.
    pub fn fail_deletes_for(&self, plant_id: PlantId) {
        self.failing_deletes.lock().unwrap().insert(plant_id);
    }

    /// Another writer updates the record right before our next write to it.
    pub fn race_next_update(&self, id: GrowthRecordId) {
        self.racing.lock().unwrap().insert(id);
    }

    pub fn growth_for(&self, plant_id: PlantId) -> Vec<GrowthRecord> {
        self.growth
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.plant_id == plant_id)
            .cloned()
            .collect()
    }

    pub fn current_growth(&self, plant_id: PlantId) -> Option<GrowthRecord> {
        self.growth_for(plant_id)
            .into_iter()
            .max_by_key(|r| r.recorded_at)
    }

    pub fn tasks_for(&self, plant_id: PlantId) -> Vec<MaintenanceTask> {
        self.tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.plant_id == plant_id)
            .cloned()
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn growth_count(&self) -> usize {
        self.growth.lock().unwrap().len()
    }

    fn check(&self, plant_id: PlantId) -> Result<(), VerdantError> {
        if self.failing.lock().unwrap().contains(&plant_id) {
            return Err(storage_failure("disk on fire"));
        }
        Ok(())
    }

    fn check_delete(&self, plant_id: PlantId) -> Result<(), VerdantError> {
        if self.failing_deletes.lock().unwrap().contains(&plant_id) {
            return Err(storage_failure("database is locked"));
        }
        Ok(())
    }
}

impl PlantRepository for InMemoryStore {
    fn list_plants(
        &self,
        filter: PlantFilter,
    ) -> impl Future<Output = Result<Vec<Plant>, VerdantError>> + Send {
        let mut plants: Vec<_> = self
            .plants
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        plants.sort_by(|a, b| a.name.cmp(&b.name));
        async { Ok(plants) }
    }

    fn get_plant(
        &self,
        id: PlantId,
    ) -> impl Future<Output = Result<Option<Plant>, VerdantError>> + Send {
        let r = self.plants.lock().unwrap().get(&id).cloned();
        async { Ok(r) }
    }

    fn plant_exists(&self, id: PlantId) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        let r = self.plants.lock().unwrap().contains_key(&id);
        async move { Ok(r) }
    }
}

impl GrowthRepository for InMemoryStore {
    fn find_current_growth(
        &self,
        plant_id: PlantId,
    ) -> impl Future<Output = Result<Option<GrowthRecord>, VerdantError>> + Send {
        let r = self.check(plant_id).map(|()| self.current_growth(plant_id));
        async { r }
    }

    fn insert_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send {
        let r = self.check(record.plant_id).map(|()| {
            self.add_growth(record.clone());
            record
        });
        async { r }
    }

    fn update_growth(
        &self,
        record: GrowthRecord,
    ) -> impl Future<Output = Result<GrowthRecord, VerdantError>> + Send {
        let r = self.check(record.plant_id).and_then(|()| {
            let mut store = self.growth.lock().unwrap();
            if self.racing.lock().unwrap().remove(&record.id) {
                if let Some(stored) = store.get_mut(&record.id) {
                    stored.version += 1;
                }
            }
            match store.get(&record.id) {
                Some(stored) if stored.version == record.version => {
                    let mut updated = record.clone();
                    updated.version += 1;
                    store.insert(updated.id, updated.clone());
                    Ok(updated)
                }
                _ => Err(ConflictError {
                    entity: "GrowthRecord",
                    id: record.id.to_string(),
                    expected: record.version,
                }
                .into()),
            }
        });
        async { r }
    }

    fn list_all_growth(&self) -> impl Future<Output = Result<Vec<GrowthRecord>, VerdantError>> + Send {
        let r: Vec<_> = self.growth.lock().unwrap().values().cloned().collect();
        async { Ok(r) }
    }

    fn delete_growth(
        &self,
        id: GrowthRecordId,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        let mut store = self.growth.lock().unwrap();
        let r = match store.get(&id).map(|record| record.plant_id) {
            Some(plant_id) => self.check_delete(plant_id).map(|()| {
                store.remove(&id);
            }),
            None => Ok(()),
        };
        async { r }
    }
}

impl TaskRepository for InMemoryStore {
    fn list_incomplete_tasks(
        &self,
        plant_id: Option<PlantId>,
        owner_id: Option<OwnerId>,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        let r = plant_id.map_or(Ok(()), |id| self.check(id)).map(|()| {
            self.tasks
                .lock()
                .unwrap()
                .values()
                .filter(|t| !t.completed)
                .filter(|t| plant_id.is_none_or(|id| t.plant_id == id))
                .filter(|t| owner_id.is_none_or(|id| t.owner_id == id))
                .cloned()
                .collect()
        });
        async { r }
    }

    fn exists_active_task(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        let r = self.check(plant_id).map(|()| {
            self.tasks
                .lock()
                .unwrap()
                .values()
                .any(|t| t.plant_id == plant_id && t.task_type == task_type && t.auto_generated && !t.completed)
        });
        async { r }
    }

    fn exists_task_scheduled_between(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<bool, VerdantError>> + Send {
        let r = self.check(plant_id).map(|()| {
            self.tasks.lock().unwrap().values().any(|t| {
                t.plant_id == plant_id
                    && t.task_type == task_type
                    && t.scheduled_date >= start
                    && t.scheduled_date < end
            })
        });
        async { r }
    }

    fn insert_task(
        &self,
        task: MaintenanceTask,
    ) -> impl Future<Output = Result<MaintenanceTask, VerdantError>> + Send {
        let r = self.check(task.plant_id).map(|()| {
            self.add_task(task.clone());
            task
        });
        async { r }
    }

    fn count_overdue_tasks(
        &self,
        owner_id: OwnerId,
        now: Timestamp,
    ) -> impl Future<Output = Result<u64, VerdantError>> + Send {
        let count = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.owner_id == owner_id && t.is_past_due(now))
            .count();
        async move { Ok(count as u64) }
    }

    fn list_tasks_by_type(
        &self,
        task_type: MaintenanceType,
    ) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        let r: Vec<_> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.task_type == task_type)
            .cloned()
            .collect();
        async { Ok(r) }
    }

    fn list_all_tasks(&self) -> impl Future<Output = Result<Vec<MaintenanceTask>, VerdantError>> + Send {
        let r: Vec<_> = self.tasks.lock().unwrap().values().cloned().collect();
        async { Ok(r) }
    }

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), VerdantError>> + Send {
        let mut store = self.tasks.lock().unwrap();
        let r = match store.get(&id).map(|task| task.plant_id) {
            Some(plant_id) => self.check_delete(plant_id).map(|()| {
                store.remove(&id);
            }),
            None => Ok(()),
        };
        async { r }
    }
}

// ── Spy notifier ───────────────────────────────────────────────

#[derive(Default)]
pub struct SpyNotifier {
    pub reminders: Mutex<Vec<(OwnerId, Vec<MaintenanceTask>)>>,
    pub pest_alerts: Mutex<Vec<(OwnerId, PlantId)>>,
    failing_owners: Mutex<HashSet<OwnerId>>,
}

impl SpyNotifier {
    pub fn fail_for(&self, owner_id: OwnerId) {
        self.failing_owners.lock().unwrap().insert(owner_id);
    }

    pub fn reminder_count(&self) -> usize {
        self.reminders.lock().unwrap().len()
    }

    fn check(&self, owner_id: OwnerId) -> Result<(), VerdantError> {
        if self.failing_owners.lock().unwrap().contains(&owner_id) {
            let err: BoxedError = Box::new(std::io::Error::other("mailbox full"));
            return Err(VerdantError::Notification(err));
        }
        Ok(())
    }
}

impl Notifier for SpyNotifier {
    fn send_reminder(
        &self,
        owner_id: OwnerId,
        tasks: &[MaintenanceTask],
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        let r = self.check(owner_id).map(|()| {
            self.reminders
                .lock()
                .unwrap()
                .push((owner_id, tasks.to_vec()));
        });
        async { r }
    }

    fn send_pest_alert(
        &self,
        owner_id: OwnerId,
        plant: &Plant,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        let r = self.check(owner_id).map(|()| {
            self.pest_alerts.lock().unwrap().push((owner_id, plant.id));
        });
        async { r }
    }
}

// ── Scripted random source ─────────────────────────────────────

/// Replays the given draws, then keeps returning the last one.
pub struct ScriptedRandom {
    draws: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let draws: VecDeque<f64> = draws.into_iter().collect();
        let fallback = draws.back().copied().unwrap_or(0.99);
        Self {
            draws: Mutex::new(draws),
            fallback,
        }
    }

    pub fn always(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_uniform(&self) -> f64 {
        self.draws.lock().unwrap().pop_front().unwrap_or(self.fallback)
    }
}
