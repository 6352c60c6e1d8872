//! Replay classifier - Scripted detections instead of a camera model.
//!
//! A script is a YAML list of steps, each holding one label for a number
//! of frames:
//!
//! ```yaml
//! - { label: "Y", confidence: 0.92, frames: 6 }
//! - { frames: 12 }            # hand out of frame
//! - { label: "3", frames: 6 }
//! ```
//!
//! Frame `n` of the capture gets the `n`-th scripted detection; past the
//! end of the script the hand is gone.

use serde::Deserialize;
use std::path::Path;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::gesture::{DetectionSample, Vocabulary};
use crate::ports::{Classifier, Frame};

fn default_confidence() -> f32 {
    0.9
}

fn default_frames() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct ReplayStep {
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default = "default_frames")]
    frames: usize,
}

/// `Classifier` that plays back a fixed detection script.
#[derive(Debug, Clone, Default)]
pub struct ReplayClassifier {
    samples: Vec<DetectionSample>,
}

impl ReplayClassifier {
    pub fn new(samples: Vec<DetectionSample>) -> Self {
        Self { samples }
    }

    pub fn from_yaml_str(script: &str) -> Result<Self, DomainError> {
        let steps: Vec<ReplayStep> = serde_yaml::from_str(script).map_err(|e| {
            DomainError::new(ErrorCode::ValidationFailed, format!("Invalid replay script: {}", e))
        })?;

        let samples = steps
            .into_iter()
            .flat_map(|step| {
                let sample = match step.label {
                    Some(label) => DetectionSample::new(label, step.confidence),
                    None => DetectionSample::no_hand(),
                };
                std::iter::repeat(sample).take(step.frames)
            })
            .collect();
        Ok(Self { samples })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let script = std::fs::read_to_string(path).map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Cannot read replay script {}: {}", path.display(), e),
            )
        })?;
        Self::from_yaml_str(&script)
    }

    /// Number of scripted frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Classifier for ReplayClassifier {
    fn classify(&self, frame: &Frame, vocabulary: Vocabulary) -> Result<DetectionSample, DomainError> {
        let scripted = usize::try_from(frame.sequence)
            .ok()
            .and_then(|index| self.samples.get(index))
            .filter(|sample| in_vocabulary(sample.label.as_deref(), vocabulary))
            .cloned()
            .unwrap_or_else(DetectionSample::no_hand);
        Ok(scripted.at(frame.captured_at))
    }
}

/// A model restricted to `vocabulary` cannot report labels outside it.
fn in_vocabulary(label: Option<&str>, vocabulary: Vocabulary) -> bool {
    let Some(label) = label else {
        return true;
    };
    let mut chars = label.chars();
    match (chars.next(), chars.next(), vocabulary) {
        (Some(c), None, Vocabulary::Letters) => c.is_ascii_alphabetic(),
        (Some(c), None, Vocabulary::Digits) => c.is_ascii_digit(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SCRIPT: &str = r#"
- { label: "Y", confidence: 0.95, frames: 2 }
- { frames: 1 }
- { label: "4", frames: 1 }
"#;

    fn frame(sequence: u64) -> Frame {
        Frame::new(sequence, Duration::from_millis(sequence * 33))
    }

    #[test]
    fn expands_steps_into_frames() {
        let replay = ReplayClassifier::from_yaml_str(SCRIPT).unwrap();
        assert_eq!(replay.len(), 4);

        let first = replay.classify(&frame(0), Vocabulary::Letters).unwrap();
        assert_eq!(first.label.as_deref(), Some("Y"));
        assert_eq!(first.confidence, 0.95);
        assert_eq!(first.captured_at, Duration::from_millis(0));

        let gap = replay.classify(&frame(2), Vocabulary::Letters).unwrap();
        assert_eq!(gap.label, None);
    }

    #[test]
    fn labels_outside_vocabulary_are_not_detected() {
        let replay = ReplayClassifier::from_yaml_str(SCRIPT).unwrap();
        assert_eq!(replay.classify(&frame(0), Vocabulary::Digits).unwrap().label, None);
        assert_eq!(
            replay.classify(&frame(3), Vocabulary::Digits).unwrap().label.as_deref(),
            Some("4")
        );
    }

    #[test]
    fn past_the_end_is_no_hand() {
        let replay = ReplayClassifier::from_yaml_str(SCRIPT).unwrap();
        let sample = replay.classify(&frame(99), Vocabulary::Digits).unwrap();
        assert_eq!(sample, DetectionSample::no_hand().at(Duration::from_millis(99 * 33)));
    }

    #[test]
    fn invalid_script_is_rejected() {
        let err = ReplayClassifier::from_yaml_str("- { frames: many }").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();
        let replay = ReplayClassifier::from_file(file.path()).unwrap();
        assert_eq!(replay.len(), 4);
    }
}
