//! Application layer - Session orchestration.
//!
//! Connects the synchronous questionnaire controller to the asynchronous
//! capture, speech and presentation ports.

pub mod kiosk;

pub use kiosk::{spawn_capture, KioskRunError, KioskRunner, KioskRunnerConfig, SessionSummary};
