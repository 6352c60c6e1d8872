//! Canonical answer values and the per-session answer map.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::question::{QuestionId, QuestionRole, QuestionSet};
use crate::domain::tax::FactSet;

/// A canonical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerValue {
    Yes,
    No,
    Number(u64),
}

impl AnswerValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Yes => Some(true),
            AnswerValue::No => Some(false),
            AnswerValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Renders as `"yes"`, `"no"` or the decimal number.
impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Yes => f.write_str("yes"),
            AnswerValue::No => f.write_str("no"),
            AnswerValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Answers collected during one questionnaire run, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerMap {
    answers: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, returning the previous value if one existed.
    pub fn insert(&mut self, id: QuestionId, value: AnswerValue) -> Option<AnswerValue> {
        self.answers.insert(id, value)
    }

    pub fn get(&self, id: QuestionId) -> Option<AnswerValue> {
        self.answers.get(&id).copied()
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.answers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, AnswerValue)> + '_ {
        self.answers.iter().map(|(id, value)| (*id, *value))
    }

    /// Returns the answers as the plain `id -> "yes"|"no"|digits` mapping.
    pub fn to_string_map(&self) -> BTreeMap<u32, String> {
        self.answers
            .iter()
            .map(|(id, value)| (id.value(), value.to_string()))
            .collect()
    }

    /// Returns the answer recorded for the question holding `role`.
    pub fn for_role(&self, questions: &QuestionSet, role: QuestionRole) -> Option<AnswerValue> {
        questions.by_role(role).and_then(|q| self.get(q.id))
    }

    /// Derives the rule engine's facts from the recorded answers.
    ///
    /// `HasChildren` holds iff the children count is positive and
    /// `SpouseHasIncome` iff the spouse salary is positive. Missing or
    /// mistyped answers leave the corresponding fact unset.
    pub fn to_facts(&self, questions: &QuestionSet) -> FactSet {
        let flag = |role| self.for_role(questions, role).and_then(|a| a.as_bool());
        let positive = |role| {
            self.for_role(questions, role)
                .and_then(|a| a.as_number())
                .map(|n| n > 0)
        };

        FactSet {
            married: flag(QuestionRole::Married),
            has_children: positive(QuestionRole::ChildrenCount),
            spouse_has_income: positive(QuestionRole::SpouseSalary),
            joint_filing: flag(QuestionRole::JointFiling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> QuestionId {
        QuestionId::new(n)
    }

    #[test]
    fn values_render_canonically() {
        assert_eq!(AnswerValue::Yes.to_string(), "yes");
        assert_eq!(AnswerValue::No.to_string(), "no");
        assert_eq!(AnswerValue::Number(427).to_string(), "427");
    }

    #[test]
    fn map_serializes_to_string_values() {
        let mut answers = AnswerMap::new();
        answers.insert(id(0), AnswerValue::Yes);
        answers.insert(id(1), AnswerValue::Number(2));
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"answers":{"0":"yes","1":"2"}}"#);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut answers = AnswerMap::new();
        answers.insert(id(0), AnswerValue::No);
        answers.clear();
        assert!(answers.is_empty());
    }

    mod fact_derivation {
        use super::*;

        #[test]
        fn derives_all_facts_from_full_answers() {
            let questions = QuestionSet::standard();
            let mut answers = AnswerMap::new();
            answers.insert(id(0), AnswerValue::Yes);
            answers.insert(id(1), AnswerValue::Number(3));
            answers.insert(id(2), AnswerValue::Yes);
            answers.insert(id(3), AnswerValue::Number(1200));
            answers.insert(id(4), AnswerValue::No);

            assert_eq!(
                answers.to_facts(&questions),
                FactSet::complete(true, true, true, false)
            );
        }

        #[test]
        fn zero_children_and_zero_salary_are_false() {
            let questions = QuestionSet::standard();
            let mut answers = AnswerMap::new();
            answers.insert(id(1), AnswerValue::Number(0));
            answers.insert(id(3), AnswerValue::Number(0));

            let facts = answers.to_facts(&questions);
            assert_eq!(facts.has_children, Some(false));
            assert_eq!(facts.spouse_has_income, Some(false));
            assert_eq!(facts.married, None);
        }

        #[test]
        fn mistyped_answer_leaves_fact_unset() {
            let questions = QuestionSet::standard();
            let mut answers = AnswerMap::new();
            answers.insert(id(0), AnswerValue::Number(1));
            assert_eq!(answers.to_facts(&questions).married, None);
        }
    }
}
