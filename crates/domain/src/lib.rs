//! # verdant-domain
//!
//! Pure domain model for the verdant plant lifecycle engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, UTC timestamps and day windows
//! - Define **Plants** (owned living entities with recurring care schedules)
//! - Define **Growth records** (height and lifecycle stage snapshots)
//! - Define **Maintenance tasks** (care work, scheduled or auto-generated)
//! - Contain the lifecycle rules: stage bands, neglect tiers, health decay thresholds
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod growth;
pub mod health;
pub mod plant;
pub mod task;
