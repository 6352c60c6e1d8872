//! Vision adapters for running without a camera model.
//!
//! - `ReplayClassifier` - Plays back a YAML detection script
//! - `TickFrameSource` - Emits frames on a fixed interval

mod replay;
mod tick_source;

pub use replay::ReplayClassifier;
pub use tick_source::TickFrameSource;
