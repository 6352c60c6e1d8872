//! Speech input configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Speech capture and transcript handling
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Run transcripts through keyword cleanup before normalizing
    #[serde(default = "default_enable_cleanup")]
    pub enable_cleanup: bool,

    /// Pause before listening again after silence
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Longer transcripts are truncated
    #[serde(default = "default_max_transcript_len")]
    pub max_transcript_len: usize,

    /// Treat a listen longer than this as silence
    pub listen_timeout_ms: Option<u64>,
}

impl SpeechConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn listen_timeout(&self) -> Option<Duration> {
        self.listen_timeout_ms.map(Duration::from_millis)
    }

    /// Validate speech configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_transcript_len == 0 {
            return Err(ValidationError::InvalidTranscriptLength);
        }
        Ok(())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enable_cleanup: default_enable_cleanup(),
            retry_delay_ms: default_retry_delay_ms(),
            max_transcript_len: default_max_transcript_len(),
            listen_timeout_ms: None,
        }
    }
}

fn default_enable_cleanup() -> bool {
    true
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_max_transcript_len() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SpeechConfig::default();
        assert!(config.enable_cleanup);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.listen_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_transcript_length_is_rejected() {
        let config = SpeechConfig {
            max_transcript_len: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTranscriptLength)
        );
    }
}
