//! # verdant-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose each lifecycle pass as a `POST /api/jobs/...` trigger so
//!   operators can run a pass without waiting for its next tick
//! - Serve the per-owner queries (reminders due today, manual health check)
//!   and pest statistics as JSON
//! - Map [`VerdantError`](verdant_domain::error::VerdantError) into HTTP
//!   status codes
//!
//! The caller's owner id travels in the `x-owner-id` header; there is no
//! authentication layer.
//!
//! ## Dependency rule
//! Depends on `verdant-app` (for services and port traits) and
//! `verdant-domain` (for domain types). Never leaks axum types into the
//! domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
