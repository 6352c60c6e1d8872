//! Questionnaire-specific error types.
//!
//! Only integration errors live here. Unrecognized or out-of-range answers
//! are not errors; they are reported as `StepOutcome::Rejected`.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::tax::RuleError;

/// Errors returned at the controller boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionnaireError {
    /// The caller drove the state machine out of protocol.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Invalid phase transition: {0}")]
    InvalidTransition(#[from] ValidationError),

    /// Evaluation was reached without the facts the rules need.
    #[error(transparent)]
    IncompleteFactSet(#[from] RuleError),

    #[error("Invalid question set: {0}")]
    InvalidQuestionSet(String),
}

impl QuestionnaireError {
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        QuestionnaireError::ProtocolViolation(message.into())
    }

    pub fn invalid_question_set(message: impl Into<String>) -> Self {
        QuestionnaireError::InvalidQuestionSet(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            QuestionnaireError::ProtocolViolation(_) => ErrorCode::ProtocolViolation,
            QuestionnaireError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
            QuestionnaireError::IncompleteFactSet(_) => ErrorCode::IncompleteFactSet,
            QuestionnaireError::InvalidQuestionSet(_) => ErrorCode::ValidationFailed,
        }
    }

    /// Returns true if the session can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuestionnaireError::ProtocolViolation(_))
    }
}

impl From<QuestionnaireError> for DomainError {
    fn from(err: QuestionnaireError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tax::Fact;

    #[test]
    fn protocol_violation_displays_reason() {
        let err = QuestionnaireError::protocol_violation("frame received in speech mode");
        assert_eq!(
            err.to_string(),
            "Protocol violation: frame received in speech mode"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn incomplete_fact_set_is_fatal() {
        let err: QuestionnaireError = RuleError::IncompleteFactSet {
            missing: vec![Fact::IsMarried],
        }
        .into();
        assert!(!err.is_recoverable());
        assert_eq!(err.code(), ErrorCode::IncompleteFactSet);
        assert_eq!(err.to_string(), "Incomplete fact set: missing IsMarried");
    }

    #[test]
    fn converts_to_domain_error_with_code() {
        let err: DomainError = QuestionnaireError::protocol_violation("x").into();
        assert_eq!(err.code, ErrorCode::ProtocolViolation);
    }
}
