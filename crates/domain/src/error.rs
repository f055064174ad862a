//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`VerdantError`] via `From`, so callers can match on the category
//! (validation, not found, authorization, conflict, infrastructure).

use std::error::Error as StdError;

/// Boxed infrastructure error carried across port boundaries.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Top-level error for every fallible operation in verdant.
#[derive(Debug, thiserror::Error)]
pub enum VerdantError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("unauthorized")]
    Unauthorized(#[from] UnauthorizedError),

    #[error("conflict")]
    Conflict(#[from] ConflictError),

    #[error("storage error")]
    Storage(#[source] BoxedError),

    #[error("notification error")]
    Notification(#[source] BoxedError),
}

impl VerdantError {
    /// Whether this error is a lost optimistic-concurrency race.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("max height must be positive, got {0}")]
    NonPositiveMaxHeight(f64),

    #[error("growth rate must not be negative, got {0}")]
    NegativeGrowthRate(f64),

    #[error("{care} frequency must be at least one day")]
    ZeroFrequency { care: &'static str },

    #[error("height {height} is outside 0..={max_height}")]
    HeightOutOfRange { height: f64, max_height: f64 },

    #[error("unrecognized {kind} value: {value:?}")]
    UnrecognizedValue { kind: &'static str, value: String },

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
}

/// A lookup for a specific item came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The caller does not own the item it is acting on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} does not belong to owner {owner}")]
pub struct UnauthorizedError {
    pub entity: &'static str,
    pub id: String,
    pub owner: String,
}

/// A compare-and-swap write lost against a concurrent writer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} was modified concurrently (expected version {expected})")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
    pub expected: u64,
}
