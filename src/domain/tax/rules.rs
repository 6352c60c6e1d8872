//! Rule engine - Decision table over the exemption rule base.
//!
//! Each rule is a conjunction of literals implying one category. Rules are
//! evaluated with three-valued logic: a rule whose antecedent contains a
//! false literal never fires, even if other facts are unset, so an
//! unmarried applicant needs no further facts.

use thiserror::Error;

use super::category::ExemptionCategory;
use super::facts::{Fact, FactSet};

/// Errors raised by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Incomplete fact set: missing {}", format_facts(.missing))]
    IncompleteFactSet { missing: Vec<Fact> },
}

fn format_facts(facts: &[Fact]) -> String {
    facts
        .iter()
        .map(Fact::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A fact asserted positively or negatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub fact: Fact,
    pub positive: bool,
}

const fn is(fact: Fact) -> Literal {
    Literal { fact, positive: true }
}

const fn not(fact: Fact) -> Literal {
    Literal { fact, positive: false }
}

/// One implication of the rule base.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub number: u8,
    pub antecedent: &'static [Literal],
    pub conclusion: ExemptionCategory,
}

use Fact::{HasChildren, IsJointFiling, IsMarried, SpouseHasIncome};

/// The exemption rule base.
pub const RULES: &[Rule] = &[
    Rule {
        number: 1,
        antecedent: &[not(IsMarried)],
        conclusion: ExemptionCategory::BaseExemption,
    },
    Rule {
        number: 2,
        antecedent: &[is(IsMarried), is(IsJointFiling), not(HasChildren), not(SpouseHasIncome)],
        conclusion: ExemptionCategory::FullExemption,
    },
    Rule {
        number: 3,
        antecedent: &[is(IsMarried), is(IsJointFiling), not(HasChildren), is(SpouseHasIncome)],
        conclusion: ExemptionCategory::FullExemptionWithoutChildren,
    },
    Rule {
        number: 4,
        antecedent: &[is(IsMarried), is(IsJointFiling), is(HasChildren), is(SpouseHasIncome)],
        conclusion: ExemptionCategory::FullExemptionWithChildren,
    },
    Rule {
        number: 5,
        antecedent: &[is(IsMarried), not(IsJointFiling), is(HasChildren)],
        conclusion: ExemptionCategory::BaseExemptionWithChildren,
    },
    Rule {
        number: 6,
        antecedent: &[is(IsMarried), not(IsJointFiling), not(HasChildren)],
        conclusion: ExemptionCategory::BaseExemption,
    },
];

/// Order in which conclusions are checked when selecting the output.
pub const CHECK_ORDER: &[ExemptionCategory] = &[
    ExemptionCategory::FullExemptionWithChildren,
    ExemptionCategory::FullExemptionWithoutChildren,
    ExemptionCategory::FullExemption,
    ExemptionCategory::BaseExemptionWithChildren,
    ExemptionCategory::BaseExemption,
];

/// Outcome of evaluating one antecedent against a partial fact set.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Truth {
    True,
    False,
    Unknown(Vec<Fact>),
}

impl Rule {
    fn evaluate(&self, facts: &FactSet) -> Truth {
        let mut missing = Vec::new();
        for literal in self.antecedent {
            match facts.get(literal.fact) {
                Some(value) if value != literal.positive => return Truth::False,
                Some(_) => {}
                None => missing.push(literal.fact),
            }
        }
        if missing.is_empty() {
            Truth::True
        } else {
            Truth::Unknown(missing)
        }
    }
}

/// Pure evaluator for the exemption rule base.
pub struct RuleEngine;

impl RuleEngine {
    /// Selects the exemption category for a fact set.
    ///
    /// Conclusions are checked in [`CHECK_ORDER`]; the first whose rule
    /// fires is returned, `Unknown` if none does.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::IncompleteFactSet` as soon as a rule that could
    /// still fire depends on an unset fact.
    pub fn evaluate(facts: &FactSet) -> Result<ExemptionCategory, RuleError> {
        for conclusion in CHECK_ORDER {
            for rule in RULES.iter().filter(|r| r.conclusion == *conclusion) {
                match rule.evaluate(facts) {
                    Truth::True => {
                        tracing::debug!(rule = rule.number, %conclusion, "rule fired");
                        return Ok(*conclusion);
                    }
                    Truth::False => {}
                    Truth::Unknown(missing) => {
                        return Err(RuleError::IncompleteFactSet { missing });
                    }
                }
            }
        }
        Ok(ExemptionCategory::Unknown)
    }

    /// Returns every rule whose antecedent holds for a complete fact set.
    pub fn fired_rules(facts: &FactSet) -> Vec<u8> {
        RULES
            .iter()
            .filter(|rule| rule.evaluate(facts) == Truth::True)
            .map(|rule| rule.number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod rule_table {
        use super::*;

        #[test]
        fn unmarried_is_base_exemption() {
            let facts = FactSet::complete(false, true, true, true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::BaseExemption)
            );
        }

        #[test]
        fn joint_without_children_or_spouse_income_is_full_exemption() {
            let facts = FactSet::complete(true, false, false, true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::FullExemption)
            );
        }

        #[test]
        fn joint_with_spouse_income_and_no_children() {
            let facts = FactSet::complete(true, false, true, true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::FullExemptionWithoutChildren)
            );
        }

        #[test]
        fn joint_with_children_and_spouse_income() {
            let facts = FactSet::complete(true, true, true, true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::FullExemptionWithChildren)
            );
        }

        #[test]
        fn separate_filing_with_children() {
            for spouse_income in [true, false] {
                let facts = FactSet::complete(true, true, spouse_income, false);
                assert_eq!(
                    RuleEngine::evaluate(&facts),
                    Ok(ExemptionCategory::BaseExemptionWithChildren)
                );
            }
        }

        #[test]
        fn separate_filing_without_children() {
            let facts = FactSet::complete(true, false, true, false);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::BaseExemption)
            );
        }

        #[test]
        fn joint_with_children_but_no_spouse_income_is_unknown() {
            let facts = FactSet::complete(true, true, false, true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::Unknown)
            );
            assert!(RuleEngine::fired_rules(&facts).is_empty());
        }
    }

    mod incomplete_facts {
        use super::*;

        #[test]
        fn empty_fact_set_fails_fast() {
            let err = RuleEngine::evaluate(&FactSet::new()).unwrap_err();
            let RuleError::IncompleteFactSet { missing } = err;
            assert!(missing.contains(&Fact::IsMarried));
        }

        #[test]
        fn unmarried_needs_no_other_facts() {
            let facts = FactSet::new().with_married(false);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::BaseExemption)
            );
        }

        #[test]
        fn separate_filing_does_not_need_spouse_income() {
            let facts = FactSet::new()
                .with_married(true)
                .with_joint_filing(false)
                .with_children(true);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Ok(ExemptionCategory::BaseExemptionWithChildren)
            );
        }

        #[test]
        fn joint_filing_without_spouse_income_fact_fails() {
            let facts = FactSet::new()
                .with_married(true)
                .with_joint_filing(true)
                .with_children(false);
            assert_eq!(
                RuleEngine::evaluate(&facts),
                Err(RuleError::IncompleteFactSet {
                    missing: vec![Fact::SpouseHasIncome]
                })
            );
        }

        #[test]
        fn error_message_names_missing_facts() {
            let err = RuleError::IncompleteFactSet {
                missing: vec![Fact::IsJointFiling, Fact::HasChildren],
            };
            assert_eq!(
                err.to_string(),
                "Incomplete fact set: missing IsJointFiling, HasChildren"
            );
        }
    }

    proptest! {
        #[test]
        fn unmarried_is_always_base_exemption(
            children in any::<Option<bool>>(),
            spouse in any::<Option<bool>>(),
            joint in any::<Option<bool>>(),
        ) {
            let facts = FactSet {
                married: Some(false),
                has_children: children,
                spouse_has_income: spouse,
                joint_filing: joint,
            };
            prop_assert_eq!(RuleEngine::evaluate(&facts), Ok(ExemptionCategory::BaseExemption));
        }

        #[test]
        fn evaluation_is_total_and_deterministic(
            married in any::<bool>(),
            children in any::<bool>(),
            spouse in any::<bool>(),
            joint in any::<bool>(),
        ) {
            let facts = FactSet::complete(married, children, spouse, joint);
            let first = RuleEngine::evaluate(&facts);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, RuleEngine::evaluate(&facts));
        }

        #[test]
        fn at_most_one_conclusion_fires(
            married in any::<bool>(),
            children in any::<bool>(),
            spouse in any::<bool>(),
            joint in any::<bool>(),
        ) {
            let facts = FactSet::complete(married, children, spouse, joint);
            prop_assert!(RuleEngine::fired_rules(&facts).len() <= 1);
        }
    }
}
