//! Configuration error types

use thiserror::Error;

use super::questions::QuestionFileError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Question definitions failed to load: {0}")]
    Questions(#[from] QuestionFileError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Confidence threshold must be in (0, 1], got {0}")]
    InvalidConfidenceThreshold(f32),

    #[error("Stabilization buffer size must be between 1 and 60")]
    InvalidBufferSize,

    #[error("Hand-removal frames must be between 1 and 300")]
    InvalidHandRemovalFrames,

    #[error("Tick interval must be between 1 and 1000 ms")]
    InvalidTickInterval,

    #[error("Sample queue capacity must be between 1 and 4096")]
    InvalidQueueCapacity,

    #[error("Maximum transcript length must be positive")]
    InvalidTranscriptLength,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
