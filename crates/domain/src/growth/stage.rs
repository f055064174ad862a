//! Growth stage: the lifecycle state machine of a plant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lifecycle stage of a plant.
///
/// `Seed` through `Blooming` are height bands. `Wilting` is an override that
/// height changes never clear, and `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum GrowthStage {
    Seed,
    Seedling,
    Budding,
    Blooming,
    Wilting,
    Dead,
}

impl GrowthStage {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Seed,
        Self::Seedling,
        Self::Budding,
        Self::Blooming,
        Self::Wilting,
        Self::Dead,
    ];

    /// Height band for `height` out of `max_height`.
    ///
    /// Bands are `[0, 20)`, `[20, 40)`, `[40, 80)` and `[80, ..]` percent.
    #[must_use]
    pub fn for_height(height: f64, max_height: f64) -> Self {
        let percent = height / max_height * 100.0;
        if percent < 20.0 {
            Self::Seed
        } else if percent < 40.0 {
            Self::Seedling
        } else if percent < 80.0 {
            Self::Budding
        } else {
            Self::Blooming
        }
    }

    /// The stage after the plant reaches `height`.
    ///
    /// Override stages pass through unchanged; only band stages are
    /// recomputed from height.
    #[must_use]
    pub fn advance(self, height: f64, max_height: f64) -> Self {
        match self {
            Self::Wilting | Self::Dead => self,
            Self::Seed | Self::Seedling | Self::Budding | Self::Blooming => {
                Self::for_height(height, max_height)
            }
        }
    }

    /// Whether no component may change this stage anymore.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Human-readable label (e.g. `"Seedling"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Seedling => "Seedling",
            Self::Budding => "Budding",
            Self::Blooming => "Blooming",
            Self::Wilting => "Wilting",
            Self::Dead => "Dead",
        }
    }

    /// Identifier name as stored and serialized (e.g. `"SEEDLING"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "SEED",
            Self::Seedling => "SEEDLING",
            Self::Budding => "BUDDING",
            Self::Blooming => "BLOOMING",
            Self::Wilting => "WILTING",
            Self::Dead => "DEAD",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = ValidationError;

    /// Accepts either the label or the identifier name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(s) || stage.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnrecognizedValue {
                kind: "growth stage",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for GrowthStage {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_height_to_bands() {
        assert_eq!(GrowthStage::for_height(0.0, 100.0), GrowthStage::Seed);
        assert_eq!(GrowthStage::for_height(19.9, 100.0), GrowthStage::Seed);
        assert_eq!(GrowthStage::for_height(20.0, 100.0), GrowthStage::Seedling);
        assert_eq!(GrowthStage::for_height(39.9, 100.0), GrowthStage::Seedling);
        assert_eq!(GrowthStage::for_height(40.0, 100.0), GrowthStage::Budding);
        assert_eq!(GrowthStage::for_height(79.9, 100.0), GrowthStage::Budding);
        assert_eq!(GrowthStage::for_height(80.0, 100.0), GrowthStage::Blooming);
        assert_eq!(GrowthStage::for_height(100.0, 100.0), GrowthStage::Blooming);
    }

    #[test]
    fn should_scale_bands_with_max_height() {
        assert_eq!(GrowthStage::for_height(10.0, 40.0), GrowthStage::Seedling);
        assert_eq!(GrowthStage::for_height(35.0, 40.0), GrowthStage::Blooming);
    }

    #[test]
    fn should_keep_wilting_sticky_when_advancing() {
        assert_eq!(GrowthStage::Wilting.advance(95.0, 100.0), GrowthStage::Wilting);
    }

    #[test]
    fn should_keep_dead_when_advancing() {
        assert_eq!(GrowthStage::Dead.advance(50.0, 100.0), GrowthStage::Dead);
    }

    #[test]
    fn should_recompute_band_stages_when_advancing() {
        assert_eq!(GrowthStage::Seedling.advance(45.0, 100.0), GrowthStage::Budding);
    }

    #[test]
    fn should_parse_label_or_identifier_ignoring_case() {
        assert_eq!("Seedling".parse::<GrowthStage>().unwrap(), GrowthStage::Seedling);
        assert_eq!("WILTING".parse::<GrowthStage>().unwrap(), GrowthStage::Wilting);
        assert_eq!("dead".parse::<GrowthStage>().unwrap(), GrowthStage::Dead);
    }

    #[test]
    fn should_fail_with_unrecognized_value() {
        let err = "sprouting".parse::<GrowthStage>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnrecognizedValue {
                kind: "growth stage",
                value: "sprouting".to_string(),
            }
        );
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let json = serde_json::to_string(&GrowthStage::Blooming).unwrap();
        assert_eq!(json, "\"BLOOMING\"");
        let parsed: GrowthStage = serde_json::from_str("\"Blooming\"").unwrap();
        assert_eq!(parsed, GrowthStage::Blooming);
    }

    #[test]
    fn should_only_treat_dead_as_terminal() {
        assert!(GrowthStage::Dead.is_terminal());
        assert!(!GrowthStage::Wilting.is_terminal());
    }
}
