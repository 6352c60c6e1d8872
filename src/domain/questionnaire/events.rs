//! Presentation events emitted by the questionnaire.
//!
//! The controller only queues these; delivery to a display or a speech
//! synthesizer is the job of a `Presenter` adapter.

use serde::Serialize;
use std::fmt;

use super::answers::AnswerValue;
use super::question::{QuestionId, QuestionKind};
use crate::domain::foundation::{ErrorCode, EventId, SessionId, Timestamp};
use crate::domain::tax::ExemptionCategory;

/// Why an answer attempt was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
    /// Nothing usable was heard.
    RecognitionMiss,
    /// The input did not map to an answer of the expected kind.
    UnrecognizedAnswer { expected: QuestionKind },
    /// The number falls outside the question's bounds.
    OutOfRange { min: u64, max: u64 },
    /// A digit count of zero was signed.
    CountOutOfRange,
}

impl RejectReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            RejectReason::RecognitionMiss => ErrorCode::RecognitionMiss,
            _ => ErrorCode::InvalidAnswer,
        }
    }

    /// The "please try again" sentence shown or spoken to the user.
    pub fn user_message(&self) -> String {
        match self {
            RejectReason::RecognitionMiss => "No speech detected. Please try again.".to_string(),
            RejectReason::UnrecognizedAnswer { expected } => match expected {
                QuestionKind::YesNo => "Please answer yes or no.".to_string(),
                QuestionKind::Number | QuestionKind::DigitCount => {
                    "Please answer with a number.".to_string()
                }
            },
            RejectReason::OutOfRange { min, max } => {
                format!("Please give a number between {} and {}.", min, max)
            }
            RejectReason::CountOutOfRange => {
                "The number of digits must be between 1 and 9.".to_string()
            }
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

/// Something the user should see or hear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum KioskEvent {
    PromptChanged {
        question_id: QuestionId,
        text: String,
    },
    Feedback {
        message: String,
        reason: Option<RejectReason>,
    },
    AnswerRecorded {
        question_id: QuestionId,
        value: AnswerValue,
        /// Filled in by a skip rule rather than answered by the user.
        auto_filled: bool,
    },
    ResultReady {
        category: ExemptionCategory,
        conclusion: String,
    },
}

impl KioskEvent {
    pub fn feedback(message: impl Into<String>) -> Self {
        KioskEvent::Feedback {
            message: message.into(),
            reason: None,
        }
    }

    pub fn rejected(reason: RejectReason) -> Self {
        KioskEvent::Feedback {
            message: reason.user_message(),
            reason: Some(reason),
        }
    }

    pub fn result_ready(category: ExemptionCategory) -> Self {
        KioskEvent::ResultReady {
            category,
            conclusion: category.description().to_string(),
        }
    }

    /// Routing key in the `kiosk.<name>.v1` form.
    pub fn event_type(&self) -> &'static str {
        match self {
            KioskEvent::PromptChanged { .. } => "kiosk.prompt_changed.v1",
            KioskEvent::Feedback { .. } => "kiosk.feedback.v1",
            KioskEvent::AnswerRecorded { .. } => "kiosk.answer_recorded.v1",
            KioskEvent::ResultReady { .. } => "kiosk.result_ready.v1",
        }
    }

    /// The line a text-to-speech layer would read out, if any.
    pub fn spoken_text(&self) -> Option<String> {
        match self {
            KioskEvent::PromptChanged { text, .. } => Some(text.clone()),
            KioskEvent::Feedback { message, .. } => Some(message.clone()),
            KioskEvent::AnswerRecorded { .. } => None,
            KioskEvent::ResultReady { conclusion, .. } => Some(format!("Result: {}", conclusion)),
        }
    }
}

/// A `KioskEvent` stamped with its session and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub occurred_at: Timestamp,
    #[serde(flatten)]
    pub event: KioskEvent,
}

impl PresentationEvent {
    pub fn new(session_id: SessionId, event: KioskEvent) -> Self {
        Self {
            event_id: EventId::new(),
            session_id,
            occurred_at: Timestamp::now(),
            event,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_bounds() {
        let reason = RejectReason::OutOfRange { min: 1, max: 99_999 };
        assert_eq!(
            reason.user_message(),
            "Please give a number between 1 and 99999."
        );
    }

    #[test]
    fn only_silence_is_a_recognition_miss() {
        assert_eq!(RejectReason::RecognitionMiss.code(), ErrorCode::RecognitionMiss);
        assert_eq!(
            RejectReason::OutOfRange { min: 0, max: 20 }.code(),
            ErrorCode::InvalidAnswer
        );
    }

    #[test]
    fn rejected_feedback_carries_reason() {
        let event = KioskEvent::rejected(RejectReason::RecognitionMiss);
        assert_eq!(
            event,
            KioskEvent::Feedback {
                message: "No speech detected. Please try again.".to_string(),
                reason: Some(RejectReason::RecognitionMiss),
            }
        );
    }

    #[test]
    fn result_is_spoken_with_prefix() {
        let event = KioskEvent::result_ready(ExemptionCategory::BaseExemption);
        assert_eq!(
            event.spoken_text().unwrap(),
            "Result: You qualify for the base personal exemption."
        );
    }

    #[test]
    fn answers_are_not_spoken() {
        let event = KioskEvent::AnswerRecorded {
            question_id: QuestionId::new(0),
            value: AnswerValue::No,
            auto_filled: false,
        };
        assert_eq!(event.spoken_text(), None);
        assert_eq!(event.event_type(), "kiosk.answer_recorded.v1");
    }

    #[test]
    fn presentation_event_serializes_flat() {
        let event = PresentationEvent::new(
            SessionId::new(),
            KioskEvent::PromptChanged {
                question_id: QuestionId::new(5),
                text: "What is your salary amount?".to_string(),
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "prompt_changed");
        assert_eq!(json["question_id"], 5);
        assert!(json["session_id"].is_string());
    }
}
