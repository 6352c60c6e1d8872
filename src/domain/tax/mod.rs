//! Tax module - Exemption rule base.
//!
//! Pure classification of a fact set into one exemption category.
//! No I/O and no dependency on how the answers were captured.

mod category;
mod facts;
mod rules;

pub use category::ExemptionCategory;
pub use facts::{Fact, FactSet};
pub use rules::{Literal, Rule, RuleEngine, RuleError, CHECK_ORDER, RULES};
