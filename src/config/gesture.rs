//! Gesture capture configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::gesture::{StabilizationPolicy, StabilizerSettings};

/// Gesture stabilization and capture pacing
#[derive(Debug, Clone, Deserialize)]
pub struct GestureConfig {
    /// How a label qualifies as stable
    #[serde(default)]
    pub policy: StabilizationPolicy,

    /// Minimum classifier confidence for a sample to count
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Consecutive matching samples needed to commit (frame-run policy)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// No-detection frames that count as the hand leaving frame
    #[serde(default = "default_hand_removal_frames")]
    pub hand_removal_frames: u32,

    /// Hold time needed to commit (confidence-duration policy)
    #[serde(default = "default_min_hold_ms")]
    pub min_hold_ms: u64,

    /// Control loop period
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Detection script for running without a camera model
    pub replay_file: Option<PathBuf>,
}

impl GestureConfig {
    pub fn stabilizer_settings(&self) -> StabilizerSettings {
        StabilizerSettings {
            policy: self.policy,
            confidence_threshold: self.confidence_threshold,
            buffer_size: self.buffer_size,
            hand_removal_frames: self.hand_removal_frames,
            min_hold: Duration::from_millis(self.min_hold_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate gesture configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(ValidationError::InvalidConfidenceThreshold(
                self.confidence_threshold,
            ));
        }
        if !(1..=60).contains(&self.buffer_size) {
            return Err(ValidationError::InvalidBufferSize);
        }
        if !(1..=300).contains(&self.hand_removal_frames) {
            return Err(ValidationError::InvalidHandRemovalFrames);
        }
        if !(1..=1000).contains(&self.tick_interval_ms) {
            return Err(ValidationError::InvalidTickInterval);
        }
        Ok(())
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            policy: StabilizationPolicy::default(),
            confidence_threshold: default_confidence_threshold(),
            buffer_size: default_buffer_size(),
            hand_removal_frames: default_hand_removal_frames(),
            min_hold_ms: default_min_hold_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            replay_file: None,
        }
    }
}

fn default_confidence_threshold() -> f32 {
    0.6
}

fn default_buffer_size() -> usize {
    5
}

fn default_hand_removal_frames() -> u32 {
    10
}

fn default_min_hold_ms() -> u64 {
    300
}

fn default_tick_interval_ms() -> u64 {
    33
}
