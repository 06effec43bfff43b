//! Manual rule entry.

use serde::{Deserialize, Serialize};

use crate::entity::CellValue;
use crate::error::{AlchemistError, Result};

use super::rule::{
    CoRunRule, Conditions, DEFAULT_WEIGHT, LoadLimitRule, PhaseWindowRule, Rule,
    SlotRestrictionRule,
};

/// Form-style input for a hand-written rule.
///
/// Blank keys are skipped; comma-separated lists are split and trimmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDraft {
    /// `co-run`, `load-limit`, `slot-restriction` (or `slot-limit`), `phase-window`.
    pub rule_type: String,
    pub condition_key: String,
    pub condition_value: String,
    pub not_with_key: String,
    /// Comma-separated.
    pub not_with_values: String,
    pub worker_group: String,
    pub max_slots_per_phase: Option<u32>,
    pub min_common_slots: Option<u32>,
    /// Comma-separated or JSON array of phase numbers.
    pub allowed_phases: String,
    pub weight: u8,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            rule_type: "co-run".to_string(),
            condition_key: String::new(),
            condition_value: String::new(),
            not_with_key: String::new(),
            not_with_values: String::new(),
            worker_group: String::new(),
            max_slots_per_phase: None,
            min_common_slots: None,
            allowed_phases: String::new(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

impl RuleDraft {
    /// Start a draft of the given rule type.
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.condition_key = key.into();
        self.condition_value = value.into();
        self
    }

    pub fn with_not_with(mut self, key: impl Into<String>, values: impl Into<String>) -> Self {
        self.not_with_key = key.into();
        self.not_with_values = values.into();
        self
    }

    pub fn with_weight(mut self, weight: u8) -> Self {
        self.weight = weight;
        self
    }

    /// Build the typed rule.
    pub fn into_rule(self) -> Result<Rule> {
        let conditions = self.conditions();
        let rule = match self.rule_type.trim() {
            "co-run" => {
                let mut rule = CoRunRule::new(self.weight);
                rule.conditions = conditions;
                let key = self.not_with_key.trim();
                if !key.is_empty() {
                    let values = self
                        .not_with_values
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .collect();
                    rule.not_with.insert(key.to_string(), values);
                }
                Rule::CoRun(rule)
            }
            "load-limit" => {
                let worker_group = self.worker_group.trim();
                if worker_group.is_empty() {
                    return Err(AlchemistError::InvalidRule(
                        "load-limit requires a worker group".to_string(),
                    ));
                }
                Rule::LoadLimit(LoadLimitRule {
                    worker_group: worker_group.to_string(),
                    max_slots_per_phase: self.max_slots_per_phase.ok_or_else(|| {
                        AlchemistError::InvalidRule(
                            "load-limit requires maxSlotsPerPhase".to_string(),
                        )
                    })?,
                    weight: self.weight,
                })
            }
            "slot-restriction" | "slot-limit" => Rule::SlotRestriction(SlotRestrictionRule {
                conditions,
                min_common_slots: self.min_common_slots.ok_or_else(|| {
                    AlchemistError::InvalidRule(
                        "slot-restriction requires minCommonSlots".to_string(),
                    )
                })?,
                weight: self.weight,
            }),
            "phase-window" => {
                let allowed_phases = CellValue::text(self.allowed_phases.as_str())
                    .parse_phase_list()
                    .filter(|phases| !phases.is_empty())
                    .ok_or_else(|| {
                        AlchemistError::InvalidRule(format!(
                            "phase-window requires a list of phases, got '{}'",
                            self.allowed_phases
                        ))
                    })?;
                Rule::PhaseWindow(PhaseWindowRule {
                    conditions,
                    allowed_phases,
                    weight: self.weight,
                })
            }
            other => {
                return Err(AlchemistError::InvalidRule(format!(
                    "unknown rule type '{}'",
                    other
                )));
            }
        };

        rule.check().map_err(AlchemistError::InvalidRule)?;
        Ok(rule)
    }

    fn conditions(&self) -> Conditions {
        let mut conditions = Conditions::new();
        let key = self.condition_key.trim();
        if !key.is_empty() {
            conditions.insert(key.to_string(), self.condition_value.trim().into());
        }
        conditions
    }
}
