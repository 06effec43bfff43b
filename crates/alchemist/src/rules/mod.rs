//! Rule model: typed rule variants and append-only rule sets.

mod draft;
mod rule;
mod set;

pub use draft::RuleDraft;
pub use rule::{
    CoRunRule, Conditions, DEFAULT_WEIGHT, LoadLimitRule, MAX_WEIGHT, PhaseWindowRule, Rule,
    SlotRestrictionRule,
};
pub use set::{RuleDocument, RuleEntry, RuleOrigin, RuleSet};
