//! # verdant-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `verdant-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Timestamps are stored as fixed-width RFC 3339 text (UTC, microseconds) so
//! that string comparison in SQL matches chronological order.
//!
//! ## Dependency rule
//! Depends on `verdant-app` (for port traits) and `verdant-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod growth_repo;
pub mod plant_repo;
pub mod pool;
pub mod task_repo;

mod timestamp;

pub use growth_repo::SqliteGrowthRepository;
pub use plant_repo::SqlitePlantRepository;
pub use pool::{Config, Database};
pub use task_repo::SqliteTaskRepository;
