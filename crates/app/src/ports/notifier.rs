//! Notifier port: outbound owner notifications.

use std::future::Future;
use std::sync::Arc;

use verdant_domain::error::VerdantError;
use verdant_domain::id::OwnerId;
use verdant_domain::plant::Plant;
use verdant_domain::task::MaintenanceTask;

/// Delivers notifications to plant owners. Formatting and transport belong
/// to the implementation.
pub trait Notifier {
    /// Tell `owner_id` about the tasks due today, in a single message.
    fn send_reminder(
        &self,
        owner_id: OwnerId,
        tasks: &[MaintenanceTask],
    ) -> impl Future<Output = Result<(), VerdantError>> + Send;

    /// Warn `owner_id` that `plant` has a new pest infestation.
    fn send_pest_alert(
        &self,
        owner_id: OwnerId,
        plant: &Plant,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for Arc<T> {
    fn send_reminder(
        &self,
        owner_id: OwnerId,
        tasks: &[MaintenanceTask],
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        (**self).send_reminder(owner_id, tasks)
    }

    fn send_pest_alert(
        &self,
        owner_id: OwnerId,
        plant: &Plant,
    ) -> impl Future<Output = Result<(), VerdantError>> + Send {
        (**self).send_pest_alert(owner_id, plant)
    }
}
