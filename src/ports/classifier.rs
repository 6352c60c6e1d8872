//! Classifier port - Per-frame hand-sign recognition.
//!
//! The model itself lives outside the crate. The kiosk only needs one
//! `(label, confidence)` result per frame for the vocabulary it asks for.

use std::time::Duration;

use crate::domain::foundation::DomainError;
use crate::domain::gesture::{DetectionSample, Vocabulary};

/// One captured camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic capture counter.
    pub sequence: u64,
    /// Offset from the start of capture.
    pub captured_at: Duration,
    /// Encoded image bytes; opaque to the kiosk.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(sequence: u64, captured_at: Duration) -> Self {
        Self {
            sequence,
            captured_at,
            data: Vec::new(),
        }
    }
}

/// Port for the hand-sign classifier.
///
/// Implementations must:
/// - Return a `DetectionSample` stamped with the frame's `captured_at`
/// - Report no detected hand as `DetectionSample::no_hand()`
/// - Only produce labels from the requested vocabulary
pub trait Classifier: Send + Sync {
    fn classify(&self, frame: &Frame, vocabulary: Vocabulary) -> Result<DetectionSample, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Classifier) {}

    #[test]
    fn new_frame_has_no_data() {
        let frame = Frame::new(3, Duration::from_millis(99));
        assert_eq!(frame.sequence, 3);
        assert!(frame.data.is_empty());
    }
}
