//! Storage-specific error type wrapping sqlx errors.

use verdant_domain::error::VerdantError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A value does not fit the column it is stored in.
    #[error("{field} value {value} is out of range for storage")]
    OutOfRange { field: &'static str, value: u64 },
}

impl From<StorageError> for VerdantError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
