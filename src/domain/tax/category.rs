//! Exemption categories produced by the rule engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of conclusions the rule engine can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExemptionCategory {
    BaseExemption,
    BaseExemptionWithChildren,
    FullExemption,
    FullExemptionWithoutChildren,
    FullExemptionWithChildren,
    /// No rule fired for the given facts.
    Unknown,
}

impl ExemptionCategory {
    /// Returns the canonical category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseExemption => "BaseExemption",
            Self::BaseExemptionWithChildren => "BaseExemptionWithChildren",
            Self::FullExemption => "FullExemption",
            Self::FullExemptionWithoutChildren => "FullExemptionWithoutChildren",
            Self::FullExemptionWithChildren => "FullExemptionWithChildren",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns the sentence spoken to the user when the result is ready.
    pub fn description(&self) -> &'static str {
        match self {
            Self::BaseExemption => "You qualify for the base personal exemption.",
            Self::BaseExemptionWithChildren => {
                "You qualify for the base personal exemption plus the dependent children allowance."
            }
            Self::FullExemption => "You qualify for the full family exemption when filing jointly.",
            Self::FullExemptionWithoutChildren => {
                "You qualify for the full joint exemption for two earners without children."
            }
            Self::FullExemptionWithChildren => {
                "You qualify for the full joint exemption for two earners with children."
            }
            Self::Unknown => "We could not determine an exemption category from your answers.",
        }
    }

    /// Returns true if a rule actually fired.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ExemptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_canonical_name() {
        assert_eq!(ExemptionCategory::FullExemption.to_string(), "FullExemption");
        assert_eq!(
            ExemptionCategory::FullExemptionWithoutChildren.to_string(),
            "FullExemptionWithoutChildren"
        );
    }

    #[test]
    fn serializes_as_canonical_name() {
        let json = serde_json::to_string(&ExemptionCategory::BaseExemptionWithChildren).unwrap();
        assert_eq!(json, "\"BaseExemptionWithChildren\"");
    }

    #[test]
    fn only_unknown_is_not_known() {
        assert!(!ExemptionCategory::Unknown.is_known());
        assert!(ExemptionCategory::BaseExemption.is_known());
    }
}
