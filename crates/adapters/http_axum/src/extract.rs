//! Request extractors.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use verdant_domain::error::ValidationError;
use verdant_domain::id::{OwnerId, PlantId};

use crate::error::ApiError;

/// Header carrying the caller's owner id.
pub const OWNER_HEADER: &str = "x-owner-id";

/// The owner id taken from the [`OWNER_HEADER`] header.
#[derive(Debug, Clone, Copy)]
pub struct Owner(pub OwnerId);

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        OwnerId::from_str(raw.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
    }
}

/// Parse a plant id taken from a path segment.
pub(crate) fn plant_id(raw: &str) -> Result<PlantId, ApiError> {
    PlantId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
}
