//! Boolean facts consumed by the rule engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named proposition in the rule base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fact {
    IsMarried,
    HasChildren,
    SpouseHasIncome,
    IsJointFiling,
}

impl Fact {
    pub fn name(&self) -> &'static str {
        match self {
            Fact::IsMarried => "IsMarried",
            Fact::HasChildren => "HasChildren",
            Fact::SpouseHasIncome => "SpouseHasIncome",
            Fact::IsJointFiling => "IsJointFiling",
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A possibly partial assignment of truth values to facts.
///
/// Unset facts stay `None`; the rule engine reports them instead of
/// assuming a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSet {
    pub married: Option<bool>,
    pub has_children: Option<bool>,
    pub spouse_has_income: Option<bool>,
    pub joint_filing: Option<bool>,
}

impl FactSet {
    /// Creates an empty fact set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fully specified fact set.
    pub fn complete(
        married: bool,
        has_children: bool,
        spouse_has_income: bool,
        joint_filing: bool,
    ) -> Self {
        Self {
            married: Some(married),
            has_children: Some(has_children),
            spouse_has_income: Some(spouse_has_income),
            joint_filing: Some(joint_filing),
        }
    }

    pub fn with_married(mut self, value: bool) -> Self {
        self.married = Some(value);
        self
    }

    pub fn with_children(mut self, value: bool) -> Self {
        self.has_children = Some(value);
        self
    }

    pub fn with_spouse_income(mut self, value: bool) -> Self {
        self.spouse_has_income = Some(value);
        self
    }

    pub fn with_joint_filing(mut self, value: bool) -> Self {
        self.joint_filing = Some(value);
        self
    }

    /// Returns the truth value of a fact, if set.
    pub fn get(&self, fact: Fact) -> Option<bool> {
        match fact {
            Fact::IsMarried => self.married,
            Fact::HasChildren => self.has_children,
            Fact::SpouseHasIncome => self.spouse_has_income,
            Fact::IsJointFiling => self.joint_filing,
        }
    }

    /// Returns the facts that have not been set.
    pub fn unset(&self) -> Vec<Fact> {
        [
            Fact::IsMarried,
            Fact::HasChildren,
            Fact::SpouseHasIncome,
            Fact::IsJointFiling,
        ]
        .into_iter()
        .filter(|fact| self.get(*fact).is_none())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fact_set_reports_every_fact_unset() {
        assert_eq!(FactSet::new().unset().len(), 4);
    }

    #[test]
    fn builder_sets_individual_facts() {
        let facts = FactSet::new().with_married(true).with_joint_filing(false);
        assert_eq!(facts.get(Fact::IsMarried), Some(true));
        assert_eq!(facts.get(Fact::IsJointFiling), Some(false));
        assert_eq!(
            facts.unset(),
            vec![Fact::HasChildren, Fact::SpouseHasIncome]
        );
    }

    #[test]
    fn complete_fact_set_has_nothing_unset() {
        assert!(FactSet::complete(true, false, true, false).unset().is_empty());
    }
}
