//! Ordered, append-only rule sets and their exported document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::suggestion::RuleSuggestion;

use super::rule::Rule;

/// Where a rule came from. Kept in memory only; never exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    /// Entered by hand.
    Manual,
    /// Accepted from the heuristic suggestion engine.
    Suggested,
    /// Translated from natural language by the model.
    Translated,
    /// Loaded from a previously exported document.
    Imported,
}

/// A rule with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub rule: Rule,
    pub origin: RuleOrigin,
}

/// Insertion-ordered rule collection.
///
/// Every insertion appends. Duplicate or contradictory rules are kept as-is
/// for human review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
}

/// The exported form of a rule set: `{ "rules": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub rules: Vec<Rule>,
}

impl RuleDocument {
    /// Convert to a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Rule, origin: RuleOrigin) {
        self.entries.push(RuleEntry { rule, origin });
    }

    /// Append a rule, returning the extended set.
    pub fn add_rule(mut self, rule: Rule, origin: RuleOrigin) -> Self {
        self.push(rule, origin);
        self
    }

    /// Append an accepted suggestion.
    pub fn accept(&mut self, suggestion: RuleSuggestion) {
        self.push(suggestion.rule, RuleOrigin::Suggested);
    }

    /// Append every rule of `other`, keeping its origins.
    pub fn merge(&mut self, other: RuleSet) {
        self.entries.extend(other.entries);
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.entries.iter().map(|e| &e.rule)
    }

    /// Rules with their origins.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Rules from one origin.
    pub fn from_origin(&self, origin: RuleOrigin) -> impl Iterator<Item = &Rule> {
        self.entries
            .iter()
            .filter(move |e| e.origin == origin)
            .map(|e| &e.rule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produce the transport-neutral export document.
    pub fn export(&self) -> RuleDocument {
        RuleDocument {
            rules: self.rules().cloned().collect(),
        }
    }

    /// Rebuild a rule set from an exported document value.
    pub fn from_document(document: Value) -> Result<Self> {
        let document: RuleDocument = serde_json::from_value(document)?;
        Ok(document.into())
    }

    /// Rebuild a rule set from exported JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: RuleDocument = serde_json::from_str(json)?;
        Ok(document.into())
    }
}

impl From<RuleDocument> for RuleSet {
    fn from(document: RuleDocument) -> Self {
        let mut set = RuleSet::new();
        for rule in document.rules {
            set.push(rule, RuleOrigin::Imported);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CoRunRule, LoadLimitRule};
    use serde_json::json;

    fn load_limit(group: &str) -> Rule {
        Rule::LoadLimit(LoadLimitRule {
            worker_group: group.to_string(),
            max_slots_per_phase: 2,
            weight: 40,
        })
    }

    #[test]
    fn test_append_keeps_duplicates_in_order() {
        let set = RuleSet::new()
            .add_rule(load_limit("Sales"), RuleOrigin::Manual)
            .add_rule(load_limit("Sales"), RuleOrigin::Translated)
            .add_rule(Rule::CoRun(CoRunRule::new(10)), RuleOrigin::Manual);

        assert_eq!(set.len(), 3);
        assert_eq!(set.rules().nth(2).map(Rule::type_name), Some("co-run"));
        assert_eq!(set.from_origin(RuleOrigin::Manual).count(), 2);
    }

    #[test]
    fn test_merge_is_additive() {
        let mut manual = RuleSet::new().add_rule(load_limit("A"), RuleOrigin::Manual);
        let translated = RuleSet::new().add_rule(load_limit("B"), RuleOrigin::Translated);
        manual.merge(translated);

        assert_eq!(manual.len(), 2);
        assert_eq!(manual.entries()[1].origin, RuleOrigin::Translated);
    }

    #[test]
    fn test_export_shape() {
        let set = RuleSet::new().add_rule(Rule::CoRun(CoRunRule::new(50)), RuleOrigin::Manual);
        let value = set.export().to_value().unwrap();

        assert_eq!(value, json!({"rules": [{"type": "co-run", "weight": 50}]}));
    }

    #[test]
    fn test_export_empty() {
        let value = RuleSet::new().export().to_value().unwrap();
        assert_eq!(value, json!({"rules": []}));
    }

    #[test]
    fn test_from_document_marks_imported() {
        let set = RuleSet::from_document(json!({"rules": [{"type": "co-run", "weight": 5}]}))
            .unwrap();
        assert_eq!(set.entries()[0].origin, RuleOrigin::Imported);
    }
}
