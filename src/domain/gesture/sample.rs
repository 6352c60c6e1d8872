//! Per-frame classifier output and symbol vocabularies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which model the external classifier should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Letters A-Z.
    Letters,
    /// Digits 0-9.
    Digits,
}

/// One classifier result for one processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSample {
    /// Predicted symbol, `None` when no hand was found.
    pub label: Option<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Offset of the frame from the start of capture.
    #[serde(default, with = "duration_millis")]
    pub captured_at: Duration,
}

impl DetectionSample {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: Some(label.into()),
            confidence: confidence.clamp(0.0, 1.0),
            captured_at: Duration::ZERO,
        }
    }

    /// The sample produced when no hand is in frame.
    pub fn no_hand() -> Self {
        Self {
            label: None,
            confidence: 0.0,
            captured_at: Duration::ZERO,
        }
    }

    pub fn at(mut self, captured_at: Duration) -> Self {
        self.captured_at = captured_at;
        self
    }
}

/// The symbols a question step accepts from the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSet {
    /// The letters Y and N.
    YesNoLetters,
    /// Single digits from `min` through 9.
    Digits { min: u8 },
}

impl SymbolSet {
    pub const ALL_DIGITS: SymbolSet = SymbolSet::Digits { min: 0 };
    pub const NONZERO_DIGITS: SymbolSet = SymbolSet::Digits { min: 1 };

    /// Returns the canonical form of `label` if it belongs to the set.
    pub fn canonicalize(&self, label: &str) -> Option<String> {
        let label = label.trim();
        match self {
            SymbolSet::YesNoLetters => {
                let upper = label.to_uppercase();
                matches!(upper.as_str(), "Y" | "N").then_some(upper)
            }
            SymbolSet::Digits { min } => {
                let mut chars = label.chars();
                let digit = chars.next()?.to_digit(10)?;
                if chars.next().is_some() || digit < u32::from(*min) {
                    return None;
                }
                Some(label.to_string())
            }
        }
    }

    /// The classifier vocabulary that can produce these symbols.
    pub fn vocabulary(&self) -> Vocabulary {
        match self {
            SymbolSet::YesNoLetters => Vocabulary::Letters,
            SymbolSet::Digits { .. } => Vocabulary::Digits,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_letters_are_canonicalized_to_uppercase() {
        assert_eq!(SymbolSet::YesNoLetters.canonicalize("y"), Some("Y".to_string()));
        assert_eq!(SymbolSet::YesNoLetters.canonicalize("N"), Some("N".to_string()));
        assert_eq!(SymbolSet::YesNoLetters.canonicalize("A"), None);
    }

    #[test]
    fn nonzero_digits_exclude_zero() {
        assert_eq!(SymbolSet::NONZERO_DIGITS.canonicalize("0"), None);
        assert_eq!(SymbolSet::NONZERO_DIGITS.canonicalize("9"), Some("9".to_string()));
        assert_eq!(SymbolSet::ALL_DIGITS.canonicalize("0"), Some("0".to_string()));
    }

    #[test]
    fn digit_sets_reject_multi_character_labels() {
        assert_eq!(SymbolSet::ALL_DIGITS.canonicalize("12"), None);
        assert_eq!(SymbolSet::ALL_DIGITS.canonicalize("Y"), None);
        assert_eq!(SymbolSet::ALL_DIGITS.canonicalize(""), None);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(DetectionSample::new("Y", 1.7).confidence, 1.0);
        assert_eq!(DetectionSample::no_hand().label, None);
    }

    #[test]
    fn sample_deserializes_without_timestamp() {
        let sample: DetectionSample =
            serde_json::from_str(r#"{"label":"4","confidence":0.9}"#).unwrap();
        assert_eq!(sample.captured_at, Duration::ZERO);
        assert_eq!(sample.label.as_deref(), Some("4"));
    }
}
