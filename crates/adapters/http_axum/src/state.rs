//! Shared application state for axum handlers.

use std::sync::Arc;

use verdant_app::services::{
    CleanupService, GrowthEngine, HealthMonitor, MaintenanceScheduler, PestEngine,
    ReminderService,
};

/// Application state shared across all axum handlers.
///
/// Generic over the plant, growth and task repositories, the notifier, the
/// random source and the clock, to avoid dynamic dispatch. `Clone` is
/// implemented manually so only the `Arc` wrappers are cloned.
pub struct AppState<P, G, T, N, R, C> {
    pub scheduler: Arc<MaintenanceScheduler<P, T, C>>,
    pub growth: Arc<GrowthEngine<P, G, T, C>>,
    pub health: Arc<HealthMonitor<P, G, T, C>>,
    pub pests: Arc<PestEngine<P, T, N, R, C>>,
    pub reminders: Arc<ReminderService<G, T, N, C>>,
    pub cleanup: Arc<CleanupService<P, G, T>>,
}

impl<P, G, T, N, R, C> Clone for AppState<P, G, T, N, R, C> {
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
            growth: Arc::clone(&self.growth),
            health: Arc::clone(&self.health),
            pests: Arc::clone(&self.pests),
            reminders: Arc::clone(&self.reminders),
            cleanup: Arc::clone(&self.cleanup),
        }
    }
}
