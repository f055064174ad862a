//! Reminder service: one digest per owner for the tasks due today.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use verdant_domain::error::VerdantError;
use verdant_domain::growth::GrowthStage;
use verdant_domain::id::{OwnerId, PlantId};
use verdant_domain::task::MaintenanceTask;
use verdant_domain::time::DayWindow;

use crate::ports::{Clock, GrowthRepository, Notifier, TaskRepository};

/// Result of the daily reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSummary {
    pub owners_notified: usize,
    pub owners_failed: usize,
    pub tasks_included: usize,
    /// Tasks left out because their plant's growth could not be read.
    pub tasks_skipped: usize,
}

/// Tasks due today, plus the plants whose growth lookup failed.
struct DueToday {
    tasks: Vec<MaintenanceTask>,
    unreadable: Vec<(PlantId, VerdantError)>,
    skipped: usize,
}

impl DueToday {
    fn into_tasks(self) -> Result<Vec<MaintenanceTask>, VerdantError> {
        match self.unreadable.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.tasks),
        }
    }
}

/// Groups the tasks due today (UTC) by owner and notifies each owner once.
///
/// Tasks of dead plants are left out.
pub struct ReminderService<G, T, N, C> {
    growth: G,
    tasks: T,
    notifier: N,
    clock: C,
}

impl<G, T, N, C> ReminderService<G, T, N, C>
where
    G: GrowthRepository,
    T: TaskRepository,
    N: Notifier,
    C: Clock,
{
    pub fn new(growth: G, tasks: T, notifier: N, clock: C) -> Self {
        Self {
            growth,
            tasks,
            notifier,
            clock,
        }
    }

    /// Send one reminder to every owner with tasks due today.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the open tasks cannot be loaded; a
    /// failed growth lookup skips that plant's tasks and a notifier failure
    /// only counts against that owner.
    #[tracing::instrument(skip(self))]
    pub async fn send_daily_reminders(&self) -> Result<ReminderSummary, VerdantError> {
        let due = self.due_today(None).await?;
        for (plant_id, err) in &due.unreadable {
            tracing::warn!(plant_id = %plant_id, error = %err, "skipping tasks of unreadable plant");
        }
        let mut by_owner: BTreeMap<OwnerId, Vec<MaintenanceTask>> = BTreeMap::new();
        for task in due.tasks {
            by_owner.entry(task.owner_id).or_default().push(task);
        }

        let mut summary = ReminderSummary {
            tasks_skipped: due.skipped,
            ..ReminderSummary::default()
        };
        for (owner_id, tasks) in &by_owner {
            match self.notifier.send_reminder(*owner_id, tasks).await {
                Ok(()) => {
                    tracing::debug!(owner_id = %owner_id, tasks = tasks.len(), "sent reminder");
                    summary.owners_notified += 1;
                    summary.tasks_included += tasks.len();
                }
                Err(err) => {
                    tracing::warn!(owner_id = %owner_id, error = %err, "failed to send reminder");
                    summary.owners_failed += 1;
                }
            }
        }

        tracing::info!(
            sent = summary.owners_notified,
            failed = summary.owners_failed,
            skipped = summary.tasks_skipped,
            "daily reminders completed"
        );
        Ok(summary)
    }

    /// Send today's reminder to a single owner. Returns the number of tasks
    /// sent; nothing is sent when none are due.
    ///
    /// # Errors
    ///
    /// Returns storage errors and notifier errors to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn send_for_owner(&self, owner_id: OwnerId) -> Result<usize, VerdantError> {
        let due = self.due_today(Some(owner_id)).await?.into_tasks()?;
        if due.is_empty() {
            tracing::debug!("no tasks due today");
            return Ok(0);
        }
        self.notifier.send_reminder(owner_id, &due).await?;
        Ok(due.len())
    }

    /// # Errors
    ///
    /// Returns a storage error from the repositories.
    pub async fn has_tasks_due_today(&self, owner_id: OwnerId) -> Result<bool, VerdantError> {
        Ok(self.tasks_due_today_count(owner_id).await? > 0)
    }

    /// # Errors
    ///
    /// Returns a storage error from the repositories.
    pub async fn tasks_due_today_count(&self, owner_id: OwnerId) -> Result<usize, VerdantError> {
        Ok(self.due_today(Some(owner_id)).await?.into_tasks()?.len())
    }

    /// Open tasks of `owner_id` whose due date has already passed.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the task repository.
    pub async fn overdue_task_count(&self, owner_id: OwnerId) -> Result<u64, VerdantError> {
        self.tasks.count_overdue_tasks(owner_id, self.clock.now()).await
    }

    async fn due_today(&self, owner_id: Option<OwnerId>) -> Result<DueToday, VerdantError> {
        let today = DayWindow::containing(self.clock.now());
        let open = self.tasks.list_incomplete_tasks(None, owner_id).await?;

        let mut alive: HashMap<PlantId, bool> = HashMap::new();
        let mut due = DueToday {
            tasks: Vec::new(),
            unreadable: Vec::new(),
            skipped: 0,
        };
        for task in open.into_iter().filter(|task| task.is_due_within(&today)) {
            let plant_alive = match alive.get(&task.plant_id) {
                Some(known) => *known,
                None => {
                    let known = match self.growth.find_current_growth(task.plant_id).await {
                        Ok(record) => record.is_none_or(|record| record.stage != GrowthStage::Dead),
                        Err(err) => {
                            due.unreadable.push((task.plant_id, err));
                            false
                        }
                    };
                    alive.insert(task.plant_id, known);
                    known
                }
            };
            if plant_alive {
                due.tasks.push(task);
            } else if due.unreadable.iter().any(|(id, _)| *id == task.plant_id) {
                due.skipped += 1;
            }
        }
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use verdant_domain::growth::GrowthRecord;
    use verdant_domain::task::MaintenanceType;
    use verdant_domain::time::Timestamp;

    use super::*;
    use crate::ports::FixedClock;
    use crate::testing::{InMemoryStore, SpyNotifier, noon};

    type Service = ReminderService<Arc<InMemoryStore>, Arc<InMemoryStore>, Arc<SpyNotifier>, Arc<FixedClock>>;

    fn service(store: &Arc<InMemoryStore>, notifier: &Arc<SpyNotifier>, now: Timestamp) -> Service {
        ReminderService::new(
            Arc::clone(store),
            Arc::clone(store),
            Arc::clone(notifier),
            Arc::new(FixedClock::at(now)),
        )
    }

    fn task_due(store: &InMemoryStore, plant_id: PlantId, owner_id: OwnerId, due: Timestamp) -> MaintenanceTask {
        let task = MaintenanceTask::builder(plant_id, owner_id, MaintenanceType::Watering, due)
            .due_date(due)
            .build();
        store.add_task(task.clone());
        task
    }

    #[tokio::test]
    async fn should_send_one_reminder_per_owner_with_all_tasks() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        for _ in 0..3 {
            task_due(&store, PlantId::new(), owner, now);
        }

        let summary = service(&store, &notifier, now).send_daily_reminders().await.unwrap();

        assert_eq!(summary.owners_notified, 1);
        assert_eq!(summary.tasks_included, 3);
        let reminders = notifier.reminders.lock().unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].0, owner);
        assert_eq!(reminders[0].1.len(), 3);
    }

    #[tokio::test]
    async fn should_use_utc_day_boundaries() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        task_due(&store, PlantId::new(), owner, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        task_due(&store, PlantId::new(), owner, Utc.with_ymd_and_hms(2024, 6, 10, 23, 59, 59).unwrap());
        task_due(&store, PlantId::new(), owner, Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap());
        task_due(&store, PlantId::new(), owner, Utc.with_ymd_and_hms(2024, 6, 9, 23, 59, 59).unwrap());

        let count = service(&store, &notifier, now)
            .tasks_due_today_count(owner)
            .await
            .unwrap();

        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn should_skip_completed_tasks_and_tasks_without_due_date() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        store.add_task(
            MaintenanceTask::builder(PlantId::new(), owner, MaintenanceType::Pruning, now)
                .due_date(now)
                .completed_at(now)
                .build(),
        );
        store.add_task(MaintenanceTask::builder(PlantId::new(), owner, MaintenanceType::Pruning, now).build());

        let service = service(&store, &notifier, now);

        assert!(!service.has_tasks_due_today(owner).await.unwrap());
        assert_eq!(service.send_for_owner(owner).await.unwrap(), 0);
        assert_eq!(notifier.reminder_count(), 0);
    }

    #[tokio::test]
    async fn should_exclude_tasks_of_dead_plants() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        let dead_plant = PlantId::new();
        store.add_growth(
            GrowthRecord::builder(dead_plant, owner, now - Duration::days(1))
                .stage(GrowthStage::Dead)
                .build(),
        );
        task_due(&store, dead_plant, owner, now);
        task_due(&store, dead_plant, owner, now + Duration::hours(1));
        let alive = task_due(&store, PlantId::new(), owner, now);

        let sent = service(&store, &notifier, now).send_for_owner(owner).await.unwrap();

        assert_eq!(sent, 1);
        let reminders = notifier.reminders.lock().unwrap();
        assert_eq!(reminders[0].1, vec![alive]);
    }

    #[tokio::test]
    async fn should_count_failed_owner_and_notify_the_others() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let failing = OwnerId::new();
        let fine = OwnerId::new();
        task_due(&store, PlantId::new(), failing, now);
        task_due(&store, PlantId::new(), fine, now);
        notifier.fail_for(failing);

        let summary = service(&store, &notifier, now).send_daily_reminders().await.unwrap();

        assert_eq!(summary.owners_notified, 1);
        assert_eq!(summary.owners_failed, 1);
        assert_eq!(notifier.reminders.lock().unwrap()[0].0, fine);
    }

    #[tokio::test]
    async fn should_skip_plant_with_failing_growth_lookup_and_notify_the_others() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let broken_plant = PlantId::new();
        let fine = OwnerId::new();
        task_due(&store, broken_plant, OwnerId::new(), now);
        let kept = task_due(&store, PlantId::new(), fine, now);
        store.fail_for(broken_plant);

        let summary = service(&store, &notifier, now).send_daily_reminders().await.unwrap();

        assert_eq!(summary.owners_notified, 1);
        assert_eq!(summary.tasks_included, 1);
        assert_eq!(summary.tasks_skipped, 1);
        let reminders = notifier.reminders.lock().unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0], (fine, vec![kept]));
    }

    #[tokio::test]
    async fn should_surface_growth_lookup_error_for_single_owner() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        let plant = PlantId::new();
        task_due(&store, plant, owner, now);
        store.fail_for(plant);

        let err = service(&store, &notifier, now).send_for_owner(owner).await.unwrap_err();

        assert!(matches!(err, VerdantError::Storage(_)));
        assert_eq!(notifier.reminder_count(), 0);
    }

    #[tokio::test]
    async fn should_surface_notifier_error_for_single_owner() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        task_due(&store, PlantId::new(), owner, now);
        notifier.fail_for(owner);

        let err = service(&store, &notifier, now).send_for_owner(owner).await.unwrap_err();

        assert!(matches!(err, VerdantError::Notification(_)));
    }

    #[tokio::test]
    async fn should_count_overdue_tasks_for_owner() {
        let now = noon(2024, 6, 10);
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(SpyNotifier::default());
        let owner = OwnerId::new();
        task_due(&store, PlantId::new(), owner, now - Duration::days(2));
        task_due(&store, PlantId::new(), owner, now - Duration::minutes(1));
        task_due(&store, PlantId::new(), owner, now + Duration::hours(1));
        task_due(&store, PlantId::new(), OwnerId::new(), now - Duration::days(2));

        let overdue = service(&store, &notifier, now).overdue_task_count(owner).await.unwrap();

        assert_eq!(overdue, 2);
    }
}
