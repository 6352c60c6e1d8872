//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the kiosk core and the collaborators it does not own.
//!
//! ## Input Ports
//!
//! - `FrameSource` - Camera capture
//! - `Classifier` - Per-frame hand-sign recognition
//! - `Transcriber` - Speech-to-text
//! - `TextCleanup` - Best-effort transcript coercion
//!
//! ## Output Ports
//!
//! - `Presenter` - Display and text-to-speech

mod classifier;
mod frame_source;
mod presenter;
mod text_cleanup;
mod transcriber;

pub use classifier::{Classifier, Frame};
pub use frame_source::FrameSource;
pub use presenter::Presenter;
pub use text_cleanup::TextCleanup;
pub use transcriber::Transcriber;
