//! Gesture stabilizer - Debounces noisy per-frame predictions.
//!
//! Turns a high-frequency stream of `(label, confidence)` samples into
//! discrete committed symbols:
//! - `Idle` → `Accumulating` while consistent detections build up
//! - `Accumulating` → `Committed` when the active policy reports a stable label
//! - `Committed` → `Idle` after the hand has been out of frame long enough
//!
//! One sustained gesture is committed exactly once.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::sample::{DetectionSample, SymbolSet};
use super::window::StabilizationWindow;

/// How a label qualifies as stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizationPolicy {
    /// The last `buffer_size` samples all carry the same accepted label.
    #[default]
    FrameRun,
    /// The same accepted label is held for at least `min_hold` of capture time.
    ConfidenceDuration,
}

/// Tuning for the stabilizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizerSettings {
    pub policy: StabilizationPolicy,
    pub confidence_threshold: f32,
    pub buffer_size: usize,
    /// Consecutive no-detection samples that count as the hand leaving frame.
    pub hand_removal_frames: u32,
    pub min_hold: Duration,
}

impl Default for StabilizerSettings {
    fn default() -> Self {
        Self {
            policy: StabilizationPolicy::FrameRun,
            confidence_threshold: 0.6,
            buffer_size: 5,
            hand_removal_frames: 10,
            min_hold: Duration::from_millis(300),
        }
    }
}

/// Lifecycle of one physical gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerState {
    Idle,
    Accumulating,
    Committed,
}

/// Commit guard over a stream of detection samples.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    settings: StabilizerSettings,
    symbols: SymbolSet,
    require_hand_removal: bool,
    /// Set when a gesture committed elsewhere is still in frame.
    held_over: bool,
    window: StabilizationWindow,
    state: StabilizerState,
    no_detection_run: u32,
    last_committed: Option<String>,
    hold: Option<(String, Duration)>,
}

impl GestureStabilizer {
    pub fn new(settings: StabilizerSettings, symbols: SymbolSet) -> Self {
        Self {
            window: StabilizationWindow::new(settings.buffer_size),
            settings,
            symbols,
            require_hand_removal: false,
            held_over: false,
            state: StabilizerState::Idle,
            no_detection_run: 0,
            last_committed: None,
            hold: None,
        }
    }

    /// Only a hand-removal gap re-arms the stabilizer; switching to a
    /// different stable label is not enough.
    pub fn requiring_hand_removal(mut self) -> Self {
        self.require_hand_removal = true;
        self
    }

    /// Feeds one sample and returns the committed symbol, if any.
    pub fn observe(&mut self, sample: &DetectionSample) -> Option<String> {
        let accepted = self.accept(sample);
        if accepted.is_some() {
            self.no_detection_run = 0;
        } else {
            self.no_detection_run = self.no_detection_run.saturating_add(1);
        }

        let candidate = match self.settings.policy {
            StabilizationPolicy::FrameRun => {
                self.window.push(accepted);
                self.window.stable_label().map(str::to_owned)
            }
            StabilizationPolicy::ConfidenceDuration => {
                self.held_label(accepted, sample.captured_at)
            }
        };

        if self.state == StabilizerState::Committed {
            if self.no_detection_run >= self.settings.hand_removal_frames {
                self.rearm();
                return None;
            }
            if self.require_hand_removal || self.held_over {
                return None;
            }
            return candidate
                .filter(|label| self.last_committed.as_ref() != Some(label))
                .map(|label| self.commit(label));
        }

        if let Some(label) = candidate {
            return Some(self.commit(label));
        }

        self.state = if self.window.has_detections() || self.hold.is_some() {
            StabilizerState::Accumulating
        } else {
            StabilizerState::Idle
        };
        None
    }

    /// Restricts the accepted symbols without releasing the commit guard.
    pub fn set_symbols(&mut self, symbols: SymbolSet) {
        self.symbols = symbols;
        self.window.clear();
        self.hold = None;
    }

    /// Treats the hand in frame as an already committed gesture.
    ///
    /// Nothing commits until the hand has left frame, whatever label the
    /// held hand is read as.
    pub fn arm_hand_removal_guard(&mut self) {
        self.window.clear();
        self.hold = None;
        self.no_detection_run = 0;
        self.last_committed = None;
        self.held_over = true;
        self.state = StabilizerState::Committed;
    }

    /// Drops all progress, including a pending hand-removal requirement.
    pub fn reset(&mut self) {
        self.window.clear();
        self.held_over = false;
        self.state = StabilizerState::Idle;
        self.no_detection_run = 0;
        self.last_committed = None;
        self.hold = None;
    }

    pub fn state(&self) -> StabilizerState {
        self.state
    }

    pub fn symbols(&self) -> SymbolSet {
        self.symbols
    }

    pub fn settings(&self) -> &StabilizerSettings {
        &self.settings
    }

    pub fn no_detection_run(&self) -> u32 {
        self.no_detection_run
    }

    /// Returns true while a committed gesture is still being held.
    pub fn awaiting_hand_removal(&self) -> bool {
        self.state == StabilizerState::Committed
    }

    fn accept(&self, sample: &DetectionSample) -> Option<String> {
        let label = sample.label.as_deref()?;
        if sample.confidence < self.settings.confidence_threshold {
            return None;
        }
        self.symbols.canonicalize(label)
    }

    fn held_label(&mut self, accepted: Option<String>, at: Duration) -> Option<String> {
        let Some(label) = accepted else {
            self.hold = None;
            return None;
        };
        match &self.hold {
            Some((held, since)) if *held == label => {
                (at.saturating_sub(*since) >= self.settings.min_hold).then_some(label)
            }
            _ => {
                self.hold = Some((label.clone(), at));
                self.settings.min_hold.is_zero().then_some(label)
            }
        }
    }

    fn commit(&mut self, label: String) -> String {
        tracing::debug!(symbol = %label, "gesture committed");
        self.state = StabilizerState::Committed;
        self.last_committed = Some(label.clone());
        self.window.clear();
        self.hold = None;
        label
    }

    fn rearm(&mut self) {
        tracing::debug!(
            frames = self.no_detection_run,
            "hand removed, stabilizer re-armed"
        );
        self.state = StabilizerState::Idle;
        self.held_over = false;
        self.last_committed = None;
        self.window.clear();
        self.hold = None;
    }
}
