//! Application configuration module
//!
//! Configuration is read from environment variables with the `SMART_TAX`
//! prefix, using `__` (double underscore) between nested keys. Every value
//! has a default, so an empty environment yields a working kiosk.
//!
//! # Example
//!
//! ```no_run
//! use smart_tax_advisor::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Tick interval: {:?}", config.gesture.tick_interval());
//! ```

mod error;
mod gesture;
mod kiosk;
mod logging;
mod questions;
mod speech;

pub use error::{ConfigError, ValidationError};
pub use gesture::GestureConfig;
pub use kiosk::KioskConfig;
pub use logging::LoggingConfig;
pub use questions::{load_questions, parse_questions, QuestionFileError};
pub use speech::SpeechConfig;

use serde::Deserialize;

use crate::application::KioskRunnerConfig;
use crate::domain::questionnaire::QuestionSet;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Gesture stabilization and capture pacing
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Speech transcript handling
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Session settings (modality, question file, queue size)
    #[serde(default)]
    pub kiosk: KioskConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SMART_TAX` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SMART_TAX__GESTURE__BUFFER_SIZE=8` -> `gesture.buffer_size = 8`
    /// - `SMART_TAX__KIOSK__DEFAULT_MODALITY=speech` -> `kiosk.default_modality = speech`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SMART_TAX")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gesture.validate()?;
        self.speech.validate()?;
        self.kiosk.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Pacing for the kiosk runner.
    pub fn runner_config(&self) -> KioskRunnerConfig {
        KioskRunnerConfig::default()
            .with_tick_interval(self.gesture.tick_interval())
            .with_retry_delay(self.speech.retry_delay())
            .with_sample_queue_capacity(self.kiosk.sample_queue_capacity)
    }

    /// The configured question file, or the built-in questions.
    pub fn question_set(&self) -> Result<QuestionSet, ConfigError> {
        Ok(load_questions(self.kiosk.questions_file.as_deref())?)
    }
}
