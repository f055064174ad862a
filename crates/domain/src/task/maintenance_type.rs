//! Maintenance type: the kind of care work a task represents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of care work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum MaintenanceType {
    Watering,
    Fertilizing,
    Pruning,
    PestControl,
}

impl MaintenanceType {
    /// Care types driven by a per-plant frequency.
    pub const RECURRING: [Self; 3] = [Self::Watering, Self::Fertilizing, Self::Pruning];

    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Watering,
        Self::Fertilizing,
        Self::Pruning,
        Self::PestControl,
    ];

    /// Human-readable label (e.g. `"Pest Control"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Watering => "Watering",
            Self::Fertilizing => "Fertilizing",
            Self::Pruning => "Pruning",
            Self::PestControl => "Pest Control",
        }
    }

    /// Identifier name as stored and serialized (e.g. `"PEST_CONTROL"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Watering => "WATERING",
            Self::Fertilizing => "FERTILIZING",
            Self::Pruning => "PRUNING",
            Self::PestControl => "PEST_CONTROL",
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceType {
    type Err = ValidationError;

    /// Accepts either the label or the identifier name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s) || kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnrecognizedValue {
                kind: "maintenance type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for MaintenanceType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
