//! Candidate rules proposed by the heuristics.

use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// A candidate rule with a human-readable rationale.
///
/// Candidates are never inserted into a rule set automatically; see
/// [`RuleSet::accept`](crate::rules::RuleSet::accept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSuggestion {
    /// The proposed rule.
    pub rule: Rule,

    /// Why the rule is proposed.
    pub rationale: String,

    /// Keys of the records that triggered the suggestion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,

    /// Which heuristic produced this suggestion.
    pub suggester: String,
}

impl RuleSuggestion {
    /// Create a new suggestion.
    pub fn new(rule: Rule, rationale: impl Into<String>) -> Self {
        Self {
            rule,
            rationale: rationale.into(),
            evidence: Vec::new(),
            suggester: String::new(),
        }
    }

    /// Set the triggering record keys.
    pub fn with_evidence(mut self, keys: Vec<String>) -> Self {
        self.evidence = keys;
        self
    }

    /// Set the suggester name.
    pub fn with_suggester(mut self, suggester: impl Into<String>) -> Self {
        self.suggester = suggester.into();
        self
    }
}
