//! Presentation adapters.
//!
//! - `ConsolePresenter` - Prints spoken lines to a terminal
//! - `TracingPresenter` - Logs events when no display is attached
//! - `InMemoryPresenter` - Captures events for tests

mod console;
mod in_memory;
mod tracing_presenter;

pub use console::ConsolePresenter;
pub use in_memory::InMemoryPresenter;
pub use tracing_presenter::TracingPresenter;
