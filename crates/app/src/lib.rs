//! # verdant-app
//!
//! Application layer: lifecycle passes and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PlantRepository`: read access to plants
//!   - `GrowthRepository`: growth records with compare-and-swap updates
//!   - `TaskRepository`: maintenance task queries and inserts
//!   - `Notifier`: owner reminders and pest alerts
//!   - `Clock`, `RandomSource`: substitutable time and randomness
//! - Define **driving/inbound ports** as use-case structs:
//!   - `MaintenanceScheduler`: recurring care tasks
//!   - `GrowthEngine`: height and stage progression, gated by neglect
//!   - `HealthMonitor`: decay from overdue maintenance
//!   - `PestEngine`: random infestations
//!   - `ReminderService`: one daily digest per owner
//!   - `CleanupService`: removes records of deleted plants
//! - Provide **in-process infrastructure** that doesn't need IO (log notifier,
//!   periodic job runner)
//!
//! ## Dependency rule
//! Depends on `verdant-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod jobs;
pub mod notifier;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
