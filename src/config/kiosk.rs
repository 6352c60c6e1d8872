//! Kiosk session configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::questionnaire::Modality;

/// Session-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct KioskConfig {
    /// Skip the modality prompt and start in this mode
    pub default_modality: Option<Modality>,

    /// YAML question definitions; the built-in set is used when absent
    pub questions_file: Option<PathBuf>,

    /// Bounded queue between frame capture and the control loop
    #[serde(default = "default_sample_queue_capacity")]
    pub sample_queue_capacity: usize,

    /// No display attached; presentation goes to the log
    #[serde(default)]
    pub headless: bool,
}

impl KioskConfig {
    /// Validate kiosk configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=4096).contains(&self.sample_queue_capacity) {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            default_modality: None,
            questions_file: None,
            sample_queue_capacity: default_sample_queue_capacity(),
            headless: false,
        }
    }
}

fn default_sample_queue_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = KioskConfig::default();
        assert_eq!(config.default_modality, None);
        assert_eq!(config.sample_queue_capacity, 64);
        assert!(!config.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_queue_is_rejected() {
        let config = KioskConfig {
            sample_queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQueueCapacity));
    }
}
