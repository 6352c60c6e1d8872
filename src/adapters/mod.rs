//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the kiosk to the outside world:
//! - `presentation` - Console, log and in-memory presenters
//! - `speech` - Line-based transcriber and keyword text cleanup
//! - `vision` - Scripted classifier and paced frame source

pub mod presentation;
pub mod speech;
pub mod vision;

pub use presentation::{ConsolePresenter, InMemoryPresenter, TracingPresenter};
pub use speech::{KeywordTextCleanup, LineTranscriber, StdinTranscriber};
pub use vision::{ReplayClassifier, TickFrameSource};
