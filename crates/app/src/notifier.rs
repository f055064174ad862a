//! In-process notifier: writes every notification to the log and fans it out
//! on a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;
use verdant_domain::error::VerdantError;
use verdant_domain::id::{OwnerId, PlantId, TaskId};
use verdant_domain::plant::Plant;
use verdant_domain::task::MaintenanceTask;

use crate::ports::Notifier;

/// A notification as handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Reminder {
        owner_id: OwnerId,
        task_ids: Vec<TaskId>,
    },
    PestAlert {
        owner_id: OwnerId,
        plant_id: PlantId,
        plant_name: String,
    },
}

/// Notifier without an outbound transport.
///
/// Delivery succeeds even when nobody subscribed.
pub struct LogNotifier {
    sender: broadcast::Sender<Notification>,
}

impl LogNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every notification sent after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for LogNotifier {
    fn send_reminder(
        &self,
        owner_id: OwnerId,
        tasks: &[MaintenanceTask],
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        for task in tasks {
            tracing::info!(
                owner_id = %owner_id,
                task_id = %task.id,
                plant_id = %task.plant_id,
                task_type = task.task_type.label(),
                notes = %task.notes,
                "maintenance due today"
            );
        }
        tracing::info!(owner_id = %owner_id, tasks = tasks.len(), "reminder sent");
        let _ = self.sender.send(Notification::Reminder {
            owner_id,
            task_ids: tasks.iter().map(|task| task.id).collect(),
        });
        async { Ok(()) }
    }

    fn send_pest_alert(
        &self,
        owner_id: OwnerId,
        plant: &Plant,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        tracing::warn!(
            owner_id = %owner_id,
            plant_id = %plant.id,
            plant_name = %plant.name,
            "pest infestation detected"
        );
        let _ = self.sender.send(Notification::PestAlert {
            owner_id,
            plant_id: plant.id,
            plant_name: plant.name.clone(),
        });
        async { Ok(()) }
    }
}
