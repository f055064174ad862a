//! Cleanup service: removes tasks and growth records left behind by deleted
//! plants.

use std::collections::HashMap;

use serde::Serialize;
use verdant_domain::error::VerdantError;
use verdant_domain::id::PlantId;

use crate::ports::{GrowthRepository, PlantRepository, TaskRepository};

/// Result of a cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    pub tasks_deleted: usize,
    pub growth_deleted: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Deletes records whose plant no longer exists.
pub struct CleanupService<P, G, T> {
    plants: P,
    growth: G,
    tasks: T,
}

impl<P, G, T> CleanupService<P, G, T>
where
    P: PlantRepository,
    G: GrowthRepository,
    T: TaskRepository,
{
    pub fn new(plants: P, growth: G, tasks: T) -> Self {
        Self { plants, growth, tasks }
    }

    /// Delete every orphaned task and growth record, one at a time.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the records cannot be listed; a failed
    /// deletion only counts in [`CleanupSummary::failed`].
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_orphans(&self) -> Result<CleanupSummary, VerdantError> {
        let tasks = self.tasks.list_all_tasks().await?;
        let records = self.growth.list_all_growth().await?;
        let mut exists: HashMap<PlantId, bool> = HashMap::new();
        let mut summary = CleanupSummary::default();

        for task in tasks {
            match self.is_orphan(task.plant_id, &mut exists).await {
                Ok(false) => summary.kept += 1,
                Ok(true) => match self.tasks.delete_task(task.id).await {
                    Ok(()) => {
                        tracing::debug!(task_id = %task.id, plant_id = %task.plant_id, "deleted orphaned task");
                        summary.tasks_deleted += 1;
                    }
                    Err(err) => {
                        tracing::warn!(task_id = %task.id, error = %err, "failed to delete orphaned task");
                        summary.failed += 1;
                    }
                },
                Err(err) => {
                    tracing::warn!(task_id = %task.id, error = %err, "failed to check task");
                    summary.failed += 1;
                }
            }
        }

        for record in records {
            match self.is_orphan(record.plant_id, &mut exists).await {
                Ok(false) => summary.kept += 1,
                Ok(true) => match self.growth.delete_growth(record.id).await {
                    Ok(()) => {
                        tracing::debug!(growth_id = %record.id, plant_id = %record.plant_id, "deleted orphaned growth record");
                        summary.growth_deleted += 1;
                    }
                    Err(err) => {
                        tracing::warn!(growth_id = %record.id, error = %err, "failed to delete orphaned growth record");
                        summary.failed += 1;
                    }
                },
                Err(err) => {
                    tracing::warn!(growth_id = %record.id, error = %err, "failed to check growth record");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            tasks_deleted = summary.tasks_deleted,
            growth_deleted = summary.growth_deleted,
            kept = summary.kept,
            failed = summary.failed,
            "orphan cleanup completed"
        );
        Ok(summary)
    }

    /// Delete all tasks and growth records of `plant_id`, unless the plant
    /// still exists.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_plant(&self, plant_id: PlantId) -> Result<CleanupSummary, VerdantError> {
        let mut summary = CleanupSummary::default();
        if self.plants.plant_exists(plant_id).await? {
            tracing::info!("plant still exists, nothing to clean up");
            return Ok(summary);
        }

        for task in self.tasks.list_all_tasks().await? {
            if task.plant_id == plant_id {
                self.tasks.delete_task(task.id).await?;
                summary.tasks_deleted += 1;
            }
        }
        for record in self.growth.list_all_growth().await? {
            if record.plant_id == plant_id {
                self.growth.delete_growth(record.id).await?;
                summary.growth_deleted += 1;
            }
        }

        tracing::info!(
            tasks_deleted = summary.tasks_deleted,
            growth_deleted = summary.growth_deleted,
            "plant records cleaned up"
        );
        Ok(summary)
    }

    async fn is_orphan(
        &self,
        plant_id: PlantId,
        cache: &mut HashMap<PlantId, bool>,
    ) -> Result<bool, VerdantError> {
        if let Some(exists) = cache.get(&plant_id) {
            return Ok(!exists);
        }
        let exists = self.plants.plant_exists(plant_id).await?;
        cache.insert(plant_id, exists);
        Ok(!exists)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use verdant_domain::growth::GrowthRecord;
    use verdant_domain::plant::Plant;
    use verdant_domain::task::{MaintenanceTask, MaintenanceType};
    use verdant_domain::time::Timestamp;

    use super::*;
    use crate::testing::{InMemoryStore, noon};

    fn cleanup(store: &Arc<InMemoryStore>) -> CleanupService<Arc<InMemoryStore>, Arc<InMemoryStore>, Arc<InMemoryStore>> {
        CleanupService::new(Arc::clone(store), Arc::clone(store), Arc::clone(store))
    }

    fn seed_records(store: &InMemoryStore, plant: &Plant, now: Timestamp) {
        store.add_growth(GrowthRecord::initial(plant));
        store.add_task(
            MaintenanceTask::builder(plant.id, plant.owner_id, MaintenanceType::Watering, now).build(),
        );
        store.add_task(
            MaintenanceTask::builder(plant.id, plant.owner_id, MaintenanceType::Pruning, now).build(),
        );
    }

    fn plant(name: &str, now: Timestamp) -> Plant {
        Plant::builder()
            .name(name)
            .planted_at(now - Duration::days(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_delete_records_of_removed_plants_only() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let kept = plant("Kept", now);
        let removed = plant("Removed", now);
        store.add_plant(kept.clone());
        seed_records(&store, &kept, now);
        seed_records(&store, &removed, now);

        let summary = cleanup(&store).cleanup_orphans().await.unwrap();

        assert_eq!(summary.tasks_deleted, 2);
        assert_eq!(summary.growth_deleted, 1);
        assert_eq!(summary.kept, 3);
        assert!(store.tasks_for(removed.id).is_empty());
        assert!(store.growth_for(removed.id).is_empty());
        assert_eq!(store.tasks_for(kept.id).len(), 2);
    }

    #[tokio::test]
    async fn should_count_failed_deletions_and_continue() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let stuck = plant("Stuck", now);
        let gone = plant("Gone", now);
        seed_records(&store, &stuck, now);
        seed_records(&store, &gone, now);
        store.fail_deletes_for(stuck.id);

        let summary = cleanup(&store).cleanup_orphans().await.unwrap();

        assert_eq!(summary.failed, 3);
        assert_eq!(summary.tasks_deleted, 2);
        assert_eq!(summary.growth_deleted, 1);
        assert!(store.tasks_for(gone.id).is_empty());
        assert_eq!(store.tasks_for(stuck.id).len(), 2);
    }

    #[tokio::test]
    async fn should_clean_up_single_deleted_plant() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let removed = plant("Removed", now);
        let other = plant("Other", now);
        seed_records(&store, &removed, now);
        seed_records(&store, &other, now);

        let summary = cleanup(&store).cleanup_plant(removed.id).await.unwrap();

        assert_eq!(summary.tasks_deleted, 2);
        assert_eq!(summary.growth_deleted, 1);
        assert_eq!(store.tasks_for(other.id).len(), 2);
    }

    #[tokio::test]
    async fn should_not_touch_records_of_existing_plant() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let alive = plant("Alive", now);
        store.add_plant(alive.clone());
        seed_records(&store, &alive, now);

        let summary = cleanup(&store).cleanup_plant(alive.id).await.unwrap();

        assert_eq!(summary, CleanupSummary::default());
        assert_eq!(store.task_count(), 2);
        assert_eq!(store.growth_count(), 1);
    }
}
