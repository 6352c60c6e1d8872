//! Question definitions.
//!
//! Questions are defined once at startup and never mutated. Each carries an
//! explicit `kind` (how the answer is captured) and `role` (what the answer
//! means to the skip rules and the fact derivation).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::errors::QuestionnaireError;

/// Stable ordering key of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an answer is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Yes or no; signed as the letters Y / N.
    #[serde(alias = "yesno")]
    YesNo,
    /// Multi-digit number; signed as a digit count followed by the digits.
    Number,
    /// Small count; signed as exactly one digit (0 permitted).
    DigitCount,
}

impl QuestionKind {
    /// Returns true if the answer is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::DigitCount)
    }
}

/// What an answer means to the rest of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionRole {
    Married,
    ChildrenCount,
    SpouseWorks,
    SpouseSalary,
    JointFiling,
    Salary,
}

impl QuestionRole {
    pub const ALL: [QuestionRole; 6] = [
        QuestionRole::Married,
        QuestionRole::ChildrenCount,
        QuestionRole::SpouseWorks,
        QuestionRole::SpouseSalary,
        QuestionRole::JointFiling,
        QuestionRole::Salary,
    ];

    /// Returns true if `kind` can carry an answer for this role.
    pub fn accepts_kind(&self, kind: QuestionKind) -> bool {
        match self {
            Self::Married | Self::SpouseWorks | Self::JointFiling => kind == QuestionKind::YesNo,
            Self::ChildrenCount => kind.is_numeric(),
            Self::SpouseSalary | Self::Salary => kind == QuestionKind::Number,
        }
    }
}

/// Inclusive range a numeric answer must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: u64,
    pub max: u64,
}

impl NumericBounds {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One immutable question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    pub role: QuestionRole,
    #[serde(default)]
    pub bounds: Option<NumericBounds>,
}

impl Question {
    pub fn new(id: u32, text: impl Into<String>, kind: QuestionKind, role: QuestionRole) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            kind,
            role,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, min: u64, max: u64) -> Self {
        self.bounds = Some(NumericBounds::new(min, max));
        self
    }
}

/// The ordered, validated list of questions for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validates and wraps an ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError::InvalidQuestionSet` if ids repeat, a
    /// role is missing or repeated, a kind does not suit its role, a prompt
    /// is empty, or bounds are inverted.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionnaireError> {
        let mut ids = HashSet::new();
        let mut roles = HashSet::new();

        for question in &questions {
            if question.text.trim().is_empty() {
                return Err(QuestionnaireError::invalid_question_set(format!(
                    "question {} has an empty prompt",
                    question.id
                )));
            }
            if !ids.insert(question.id) {
                return Err(QuestionnaireError::invalid_question_set(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
            if !roles.insert(question.role) {
                return Err(QuestionnaireError::invalid_question_set(format!(
                    "role {:?} is assigned to more than one question",
                    question.role
                )));
            }
            if !question.role.accepts_kind(question.kind) {
                return Err(QuestionnaireError::invalid_question_set(format!(
                    "question {} cannot use kind {:?} for role {:?}",
                    question.id, question.kind, question.role
                )));
            }
            if let Some(bounds) = question.bounds {
                if !question.kind.is_numeric() || bounds.min > bounds.max {
                    return Err(QuestionnaireError::invalid_question_set(format!(
                        "question {} has unusable bounds",
                        question.id
                    )));
                }
            }
        }

        if let Some(role) = QuestionRole::ALL.iter().find(|r| !roles.contains(*r)) {
            return Err(QuestionnaireError::invalid_question_set(format!(
                "no question has role {:?}",
                role
            )));
        }

        Ok(Self { questions })
    }

    /// The built-in six-question set.
    pub fn standard() -> Self {
        Self {
            questions: vec![
                Question::new(0, "Are you married?", QuestionKind::YesNo, QuestionRole::Married),
                Question::new(
                    1,
                    "How many children do you have?",
                    QuestionKind::DigitCount,
                    QuestionRole::ChildrenCount,
                )
                .with_bounds(0, 20),
                Question::new(
                    2,
                    "Does your spouse work?",
                    QuestionKind::YesNo,
                    QuestionRole::SpouseWorks,
                ),
                Question::new(
                    3,
                    "If yes, what is your spouse salary; 0 if no income?",
                    QuestionKind::Number,
                    QuestionRole::SpouseSalary,
                )
                .with_bounds(0, 99_999),
                Question::new(
                    4,
                    "Are you filing taxes jointly?",
                    QuestionKind::YesNo,
                    QuestionRole::JointFiling,
                ),
                Question::new(
                    5,
                    "What is your salary amount?",
                    QuestionKind::Number,
                    QuestionRole::Salary,
                )
                .with_bounds(1, 99_999),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn by_role(&self, role: QuestionRole) -> Option<&Question> {
        self.questions.iter().find(|q| q.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_valid() {
        let standard = QuestionSet::standard();
        let revalidated = QuestionSet::new(standard.iter().cloned().collect());
        assert_eq!(revalidated, Ok(standard));
    }

    #[test]
    fn standard_set_keeps_source_ordering() {
        let set = QuestionSet::standard();
        let ids: Vec<u32> = set.iter().map(|q| q.id.value()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(set.get(0).unwrap().role, QuestionRole::Married);
        assert_eq!(set.get(5).unwrap().role, QuestionRole::Salary);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut questions: Vec<Question> = QuestionSet::standard().iter().cloned().collect();
        questions[1].id = QuestionId::new(0);
        assert!(QuestionSet::new(questions).is_err());
    }

    #[test]
    fn missing_role_is_rejected() {
        let mut questions: Vec<Question> = QuestionSet::standard().iter().cloned().collect();
        questions.pop();
        let err = QuestionSet::new(questions).unwrap_err();
        assert!(err.to_string().contains("Salary"));
    }

    #[test]
    fn kind_must_suit_role() {
        let mut questions: Vec<Question> = QuestionSet::standard().iter().cloned().collect();
        questions[0].kind = QuestionKind::Number;
        assert!(QuestionSet::new(questions).is_err());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut questions: Vec<Question> = QuestionSet::standard().iter().cloned().collect();
        questions[5].bounds = Some(NumericBounds::new(10, 1));
        assert!(QuestionSet::new(questions).is_err());
    }

    #[test]
    fn kind_accepts_legacy_yesno_spelling() {
        let kind: QuestionKind = serde_json::from_str("\"yesno\"").unwrap();
        assert_eq!(kind, QuestionKind::YesNo);
        let kind: QuestionKind = serde_json::from_str("\"digit_count\"").unwrap();
        assert_eq!(kind, QuestionKind::DigitCount);
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = NumericBounds::new(1, 99_999);
        assert!(bounds.contains(1));
        assert!(bounds.contains(99_999));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(100_000));
    }
}
