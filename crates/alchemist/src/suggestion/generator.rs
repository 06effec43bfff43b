//! Heuristic rule generation from the current dataset.
//!
//! Two independent heuristics, both of which may fire:
//! - co-run: tasks sharing a category probably run together;
//! - load-limit: a worker with fewer available slots than its per-phase
//!   maximum is probably overloaded.

use indexmap::IndexMap;
use tracing::debug;

use crate::entity::{Dataset, EntityRecord, TaskRecord, WorkerRecord};
use crate::rules::{CoRunRule, LoadLimitRule, Rule};

use super::RuleSuggestion;

/// Heuristic thresholds and default weights.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// Distinct tasks a category needs before a co-run is proposed.
    pub min_tasks_per_category: usize,
    /// How many task IDs a co-run suggestion names.
    pub co_run_task_count: usize,
    /// Weight of co-run suggestions.
    pub co_run_weight: u8,
    /// Weight of load-limit suggestions.
    pub load_limit_weight: u8,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_tasks_per_category: 2,
            co_run_task_count: 2,
            co_run_weight: 50,
            load_limit_weight: 40,
        }
    }
}

/// Generates candidate rules using heuristics.
pub struct SuggestionEngine {
    config: SuggestionConfig,
}

impl SuggestionEngine {
    /// Create an engine with default thresholds.
    pub fn new() -> Self {
        Self::with_config(SuggestionConfig::default())
    }

    /// Create an engine with custom thresholds.
    pub fn with_config(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Run every heuristic over the dataset. Co-run candidates come first.
    pub fn suggest(&self, dataset: &Dataset) -> Vec<RuleSuggestion> {
        let mut suggestions = self.suggest_co_run(&dataset.tasks);
        suggestions.extend(self.suggest_load_limits(&dataset.workers));

        debug!(
            tasks = dataset.tasks.len(),
            workers = dataset.workers.len(),
            suggestions = suggestions.len(),
            "generated rule suggestions"
        );
        suggestions
    }

    /// One co-run candidate per category with enough distinct tasks.
    ///
    /// Categories are visited in first-appearance order. Tasks without a key
    /// or a category are ignored.
    pub fn suggest_co_run(&self, tasks: &[TaskRecord]) -> Vec<RuleSuggestion> {
        let mut by_category: IndexMap<String, Vec<String>> = IndexMap::new();

        for task in tasks {
            let (Some(task_id), Some(category)) = (task.key(), task.category.as_key()) else {
                continue;
            };
            let ids = by_category.entry(category).or_default();
            if !ids.contains(&task_id) {
                ids.push(task_id);
            }
        }

        by_category
            .into_iter()
            .filter(|(_, ids)| ids.len() >= self.config.min_tasks_per_category)
            .map(|(category, ids)| {
                let named: Vec<String> =
                    ids.iter().take(self.config.co_run_task_count).cloned().collect();
                let rule = CoRunRule::new(self.config.co_run_weight).with_tasks(named);

                RuleSuggestion::new(
                    Rule::CoRun(rule),
                    format!("Tasks in category '{}' often run together.", category),
                )
                .with_evidence(ids)
                .with_suggester("co_run_heuristic")
            })
            .collect()
    }

    /// One load-limit candidate per worker whose slot count is below its
    /// per-phase maximum.
    ///
    /// Unparseable slots count as zero; a non-numeric maximum skips the worker.
    pub fn suggest_load_limits(&self, workers: &[WorkerRecord]) -> Vec<RuleSuggestion> {
        let mut suggestions = Vec::new();

        for (index, worker) in workers.iter().enumerate() {
            let Some(max_load) = worker.max_load_per_phase.as_number() else {
                continue;
            };
            let slots = worker
                .available_slots
                .parse_phase_list()
                .map(|s| s.len())
                .unwrap_or(0);

            if (slots as f64) < max_load {
                let worker_key = worker.key().unwrap_or_else(|| format!("row {}", index + 1));
                let rule = LoadLimitRule {
                    worker_group: worker.worker_group.as_text().trim().to_string(),
                    max_slots_per_phase: slots as u32,
                    weight: self.config.load_limit_weight,
                };

                suggestions.push(
                    RuleSuggestion::new(
                        Rule::LoadLimit(rule),
                        format!(
                            "Worker {} is likely overloaded: {} available slot(s) \
                             but MaxLoadPerPhase is {}.",
                            worker_key,
                            slots,
                            worker.max_load_per_phase.as_text()
                        ),
                    )
                    .with_evidence(vec![worker_key])
                    .with_suggester("load_heuristic"),
                );
            }
        }

        suggestions
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CellValue, RawRow};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
            .collect()
    }

    fn task(id: &str, category: &str) -> TaskRecord {
        TaskRecord::from_row(row(&[("TaskID", id), ("Category", category)]))
    }

    fn worker(id: &str, group: &str, slots: &str, max_load: &str) -> WorkerRecord {
        WorkerRecord::from_row(row(&[
            ("WorkerID", id),
            ("WorkerGroup", group),
            ("AvailableSlots", slots),
            ("MaxLoadPerPhase", max_load),
        ]))
    }

    #[test]
    fn test_co_run_per_category() {
        let engine = SuggestionEngine::new();
        let suggestions = engine.suggest_co_run(&[
            task("T1", "Medical"),
            task("T2", "Medical"),
            task("T3", "Admin"),
        ]);

        assert_eq!(suggestions.len(), 1);
        match &suggestions[0].rule {
            Rule::CoRun(r) => {
                assert_eq!(r.tasks, vec!["T1", "T2"]);
                assert_eq!(r.weight, 50);
            }
            other => panic!("unexpected rule {:?}", other),
        }
        assert!(suggestions[0].rationale.contains("Medical"));
    }

    #[test]
    fn test_co_run_names_first_two_distinct() {
        let engine = SuggestionEngine::new();
        let suggestions = engine.suggest_co_run(&[
            task("T1", "Ops"),
            task("T1", "Ops"),
            task("T4", "Ops"),
            task("T5", "Ops"),
        ]);

        match &suggestions[0].rule {
            Rule::CoRun(r) => assert_eq!(r.tasks, vec!["T1", "T4"]),
            other => panic!("unexpected rule {:?}", other),
        }
        assert_eq!(suggestions[0].evidence.len(), 3);
    }

    #[test]
    fn test_duplicate_task_id_is_not_two_tasks() {
        let engine = SuggestionEngine::new();
        assert!(engine
            .suggest_co_run(&[task("T1", "Ops"), task("T1", "Ops")])
            .is_empty());
    }

    #[test]
    fn test_co_run_threshold_is_configurable() {
        let engine = SuggestionEngine::with_config(SuggestionConfig {
            min_tasks_per_category: 3,
            ..SuggestionConfig::default()
        });
        assert!(engine
            .suggest_co_run(&[task("T1", "Ops"), task("T2", "Ops")])
            .is_empty());
    }

    #[test]
    fn test_load_limit_for_overloaded_worker() {
        let engine = SuggestionEngine::new();
        let suggestions = engine.suggest_load_limits(&[
            worker("W1", "Sales", "[1,2]", "3"),
            worker("W2", "Ops", "[1,2,3]", "2"),
            worker("W3", "Ops", "[1]", "n/a"),
        ]);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[0].rule,
            Rule::LoadLimit(LoadLimitRule {
                worker_group: "Sales".to_string(),
                max_slots_per_phase: 2,
                weight: 40,
            })
        );
        assert_eq!(suggestions[0].evidence, vec!["W1"]);
    }

    #[test]
    fn test_unparseable_slots_count_as_zero() {
        let engine = SuggestionEngine::new();
        let suggestions = engine.suggest_load_limits(&[worker("W1", "Sales", "a,b", "1")]);

        match &suggestions[0].rule {
            Rule::LoadLimit(r) => assert_eq!(r.max_slots_per_phase, 0),
            other => panic!("unexpected rule {:?}", other),
        }
    }

    #[test]
    fn test_both_heuristics_fire() {
        let engine = SuggestionEngine::new();
        let dataset = Dataset {
            clients: vec![],
            workers: vec![worker("W1", "Sales", "1", "4")],
            tasks: vec![task("T1", "Medical"), task("T2", "Medical")],
        };

        let suggestions = engine.suggest(&dataset);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].rule.type_name(), "co-run");
        assert_eq!(suggestions[1].rule.type_name(), "load-limit");
    }
}
