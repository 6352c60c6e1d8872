//! Gesture module - From noisy classifier frames to committed symbols.
//!
//! # Components
//!
//! - `DetectionSample` - One classifier result per frame
//! - `GestureStabilizer` - Debounce with a hand-removal commit guard
//! - `DigitEntryProtocol` - Digit count, then that many digits

mod digit_entry;
mod sample;
mod stabilizer;
mod window;

pub use digit_entry::{
    DigitEntryError, DigitEntryMode, DigitEntryProgress, DigitEntryProtocol, DigitEntryStage,
    DigitEntryState,
};
pub use sample::{DetectionSample, SymbolSet, Vocabulary};
pub use stabilizer::{
    GestureStabilizer, StabilizationPolicy, StabilizerSettings, StabilizerState,
};
pub use window::StabilizationWindow;
