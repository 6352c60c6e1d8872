//! Speech adapters.
//!
//! - `KeywordTextCleanup` - Offline `TextCleanup` over keyword lists
//! - `LineTranscriber` - `Transcriber` reading one utterance per line

mod keyword_cleanup;
mod line_transcriber;

pub use keyword_cleanup::KeywordTextCleanup;
pub use line_transcriber::{LineTranscriber, StdinTranscriber};
