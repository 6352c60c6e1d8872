//! Questionnaire module - Question progression and answer capture.
//!
//! # Events
//!
//! - `PromptChanged` - A new question is shown and spoken
//! - `Feedback` - A "please try again" style message
//! - `AnswerRecorded` - An answer was committed or auto-filled
//! - `ResultReady` - The exemption category was derived

mod answers;
mod controller;
mod errors;
mod events;
mod normalizer;
mod phase;
mod question;

pub use answers::{AnswerMap, AnswerValue};
pub use controller::{QuestionnaireController, StepOutcome};
pub use errors::QuestionnaireError;
pub use events::{KioskEvent, PresentationEvent, RejectReason};
pub use normalizer::AnswerNormalizer;
pub use phase::{Modality, SessionPhase};
pub use question::{NumericBounds, Question, QuestionId, QuestionKind, QuestionRole, QuestionSet};
