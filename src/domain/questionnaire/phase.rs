//! Session phase and input modality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// How the user answers for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Gesture,
    Speech,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modality::Gesture => "gesture",
            Modality::Speech => "speech",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Modality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gesture" | "sign" => Ok(Modality::Gesture),
            "speech" | "voice" => Ok(Modality::Speech),
            other => Err(ValidationError::invalid_format(
                "modality",
                format!("unknown modality '{}'", other),
            )),
        }
    }
}

/// Where a questionnaire session is in its lifecycle.
///
/// Indices refer to positions in the question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "index")]
pub enum SessionPhase {
    SelectingModality,
    AskingQuestion(usize),
    AwaitingAnswer(usize),
    AnsweredAdvancing(usize),
    Evaluating,
    Done,
    Aborted,
}

impl SessionPhase {
    /// Index of the question this phase concerns, if any.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            SessionPhase::AskingQuestion(i)
            | SessionPhase::AwaitingAnswer(i)
            | SessionPhase::AnsweredAdvancing(i) => Some(*i),
            _ => None,
        }
    }
}

impl StateMachine for SessionPhase {
    /// Valid transitions:
    /// - SelectingModality -> AskingQuestion(0)
    /// - AskingQuestion(i) -> AwaitingAnswer(i)
    /// - AwaitingAnswer(i) -> AnsweredAdvancing(i)
    /// - AnsweredAdvancing(i) -> AskingQuestion(j) for j > i, or Evaluating
    /// - Evaluating -> Done
    /// - any non-terminal phase -> Aborted
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        match (self, target) {
            (Done | Aborted, _) => false,
            (_, Aborted) => true,
            (SelectingModality, AskingQuestion(0)) => true,
            (AskingQuestion(i), AwaitingAnswer(j)) => i == j,
            (AwaitingAnswer(i), AnsweredAdvancing(j)) => i == j,
            (AnsweredAdvancing(i), AskingQuestion(j)) => j > i,
            (AnsweredAdvancing(_), Evaluating) => true,
            (Evaluating, Done) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            SelectingModality => vec![AskingQuestion(0), Aborted],
            AskingQuestion(i) => vec![AwaitingAnswer(*i), Aborted],
            AwaitingAnswer(i) => vec![AnsweredAdvancing(*i), Aborted],
            AnsweredAdvancing(i) => vec![AskingQuestion(i + 1), Evaluating, Aborted],
            Evaluating => vec![Done, Aborted],
            Done | Aborted => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionPhase::*;

    #[test]
    fn happy_path_is_valid() {
        let path = [
            SelectingModality,
            AskingQuestion(0),
            AwaitingAnswer(0),
            AnsweredAdvancing(0),
            AskingQuestion(5),
            AwaitingAnswer(5),
            AnsweredAdvancing(5),
            Evaluating,
            Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn cannot_answer_a_different_question() {
        assert!(!AskingQuestion(1).can_transition_to(&AwaitingAnswer(2)));
        assert!(!AwaitingAnswer(1).can_transition_to(&AnsweredAdvancing(0)));
    }

    #[test]
    fn cannot_go_back_to_earlier_question() {
        assert!(!AnsweredAdvancing(3).can_transition_to(&AskingQuestion(3)));
        assert!(!AnsweredAdvancing(3).can_transition_to(&AskingQuestion(1)));
    }

    #[test]
    fn any_active_phase_can_abort() {
        for phase in [SelectingModality, AwaitingAnswer(2), Evaluating] {
            assert!(phase.can_transition_to(&Aborted));
        }
    }

    #[test]
    fn done_and_aborted_are_terminal() {
        assert!(Done.is_terminal());
        assert!(Aborted.is_terminal());
        assert!(Done.transition_to(Aborted).is_err());
    }

    #[test]
    fn question_index_is_exposed() {
        assert_eq!(AwaitingAnswer(4).question_index(), Some(4));
        assert_eq!(Evaluating.question_index(), None);
    }

    #[test]
    fn modality_parses_case_insensitively() {
        assert_eq!("Speech".parse::<Modality>().unwrap(), Modality::Speech);
        assert_eq!("gesture".parse::<Modality>().unwrap(), Modality::Gesture);
        assert!("keyboard".parse::<Modality>().is_err());
    }
}
