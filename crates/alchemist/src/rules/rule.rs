//! Rule variants consumed by the downstream allocator.
//!
//! Wire format is internally tagged by `"type"` with camelCase fields:
//!
//! ```json
//! { "type": "co-run", "conditions": { "Category": "Surgery" },
//!   "notWith": { "Category": ["ICU"] }, "weight": 50 }
//! ```

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Largest allowed rule weight.
pub const MAX_WEIGHT: u8 = 100;

/// Weight used when a rule omits one.
pub const DEFAULT_WEIGHT: u8 = 50;

/// Field -> value predicate; values are JSON scalars (`"Surgery"`, `5`, `true`).
pub type Conditions = IndexMap<String, Value>;

fn default_weight() -> u8 {
    DEFAULT_WEIGHT
}

/// Accept any JSON number that is a whole number within `0..=MAX_WEIGHT`.
fn deserialize_weight<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let weight = f64::deserialize(deserializer)?;
    if weight.fract() != 0.0 || !(0.0..=f64::from(MAX_WEIGHT)).contains(&weight) {
        return Err(D::Error::custom(format!(
            "weight {} is not a whole number in 0..={}",
            weight, MAX_WEIGHT
        )));
    }
    Ok(weight as u8)
}

/// A typed allocation constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Rule {
    /// Records matching `conditions` should (not) run alongside others.
    CoRun(CoRunRule),
    /// Caps the slots a worker group takes per phase.
    LoadLimit(LoadLimitRule),
    /// Requires a group to share a minimum number of common slots.
    #[serde(alias = "slot-limit")]
    SlotRestriction(SlotRestrictionRule),
    /// Restricts matching tasks to a set of phases.
    PhaseWindow(PhaseWindowRule),
}

/// Co-run constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoRunRule {
    /// Field -> value predicate selecting the records the rule applies to.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conditions: Conditions,
    /// Field -> values that must not co-run with the selected records.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub not_with: IndexMap<String, Vec<String>>,
    /// Task IDs that should run together.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: u8,
}

impl CoRunRule {
    /// An unconstrained co-run rule with the given weight.
    pub fn new(weight: u8) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    /// Add an exclusion.
    pub fn with_not_with(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.not_with.insert(field.into(), values);
        self
    }

    /// Set the co-running task IDs.
    pub fn with_tasks(mut self, tasks: Vec<String>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Per-phase load cap for a worker group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadLimitRule {
    #[serde(alias = "WorkerGroup")]
    pub worker_group: String,
    pub max_slots_per_phase: u32,
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: u8,
}

/// Minimum shared slots for a client or worker group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRestrictionRule {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conditions: Conditions,
    pub min_common_slots: u32,
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: u8,
}

/// Allowed phases for matching tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseWindowRule {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conditions: Conditions,
    pub allowed_phases: Vec<i64>,
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: u8,
}

impl Rule {
    /// Wire name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Rule::CoRun(_) => "co-run",
            Rule::LoadLimit(_) => "load-limit",
            Rule::SlotRestriction(_) => "slot-restriction",
            Rule::PhaseWindow(_) => "phase-window",
        }
    }

    /// Importance score in [0, 100].
    pub fn weight(&self) -> u8 {
        match self {
            Rule::CoRun(r) => r.weight,
            Rule::LoadLimit(r) => r.weight,
            Rule::SlotRestriction(r) => r.weight,
            Rule::PhaseWindow(r) => r.weight,
        }
    }

    /// Structural checks beyond what deserialization enforces.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.weight() > MAX_WEIGHT {
            return Err(format!(
                "weight {} is outside 0..={}",
                self.weight(),
                MAX_WEIGHT
            ));
        }
        Ok(())
    }
}
