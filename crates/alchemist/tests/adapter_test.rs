//! Tests for the model-backed operations, driven by scripted responses.

use std::sync::Arc;

use serde_json::Value;

use alchemist::llm::prompts::{EDIT_TEMPERATURE, FIX_TEMPERATURE};
use alchemist::rules::{CoRunRule, PhaseWindowRule};
use alchemist::{
    Alchemist, AlchemistError, CellValue, Dataset, EntityKind, EntityRecord, LlmConfig,
    MockProvider, RawRow, Rule, RuleOrigin, RuleSet,
};

fn raw(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
        .collect()
}

fn sample_dataset() -> Dataset {
    Dataset::from_rows(
        vec![raw(&[("ClientID", "C1"), ("PriorityLevel", "9")])],
        vec![raw(&[("WorkerID", "W1"), ("WorkerGroup", "Sales")])],
        vec![raw(&[("TaskID", "T1"), ("Duration", "2")])],
    )
}

fn with_mock(mock: MockProvider) -> (Alchemist, Arc<MockProvider>) {
    let mock = Arc::new(mock);
    let alchemist = Alchemist::new().with_shared_llm(mock.clone());
    (alchemist, mock)
}

// =============================================================================
// Natural Language to Rule
// =============================================================================

#[test]
fn test_translate_extracts_object_from_noise() {
    let (alchemist, mock) = with_mock(
        MockProvider::new().with_response(r#"noise noise {"type":"co-run","weight":50} trailing"#),
    );

    let rule = alchemist
        .translate_rule("T1 and T2 always run together")
        .expect("Translation failed");

    assert_eq!(rule, Rule::CoRun(CoRunRule::new(50)));
    assert!(
        mock.requests()[0]
            .prompt
            .contains("Statement: T1 and T2 always run together")
    );
}

#[test]
fn test_translate_without_object() {
    let (alchemist, _) = with_mock(MockProvider::new().with_response("Sorry, I can't do that."));

    let result = alchemist.translate_rule("whatever");
    assert!(matches!(result, Err(AlchemistError::NoStructuredOutput)));
}

#[test]
fn test_translate_malformed_json() {
    let (alchemist, _) =
        with_mock(MockProvider::new().with_response("Here you go: {\"type\": \"co-run\", weight}"));

    let result = alchemist.translate_rule("whatever");
    assert!(matches!(result, Err(AlchemistError::MalformedRuleJson(_))));
}

#[test]
fn test_translate_rejects_unknown_shape() {
    let (alchemist, _) = with_mock(
        MockProvider::new()
            .with_response(r#"{"rule": "Surgery not with ICU"}"#)
            .with_response(r#"{"type":"phase-window","allowedPhases":[1,2],"weight":300}"#),
    );

    assert!(matches!(
        alchemist.translate_rule("first"),
        Err(AlchemistError::MalformedRuleJson(_))
    ));
    assert!(matches!(
        alchemist.translate_rule("second"),
        Err(AlchemistError::MalformedRuleJson(_))
    ));
}

#[test]
fn test_translated_rule_joins_rule_set() {
    let (alchemist, _) = with_mock(MockProvider::new().with_response(
        "```json\n{\"type\":\"phase-window\",\"conditions\":{\"TaskID\":\"T1\"},\
         \"allowedPhases\":[1,2],\"weight\":60}\n```",
    ));

    let rule = alchemist
        .translate_rule("T1 only in phases 1 and 2")
        .expect("Translation failed");
    let rules = RuleSet::new().add_rule(rule, RuleOrigin::Translated);

    assert_eq!(
        rules.rules().next(),
        Some(&Rule::PhaseWindow(PhaseWindowRule {
            conditions: [("TaskID".to_string(), Value::from("T1"))].into_iter().collect(),
            allowed_phases: vec![1, 2],
            weight: 60,
        }))
    );
}

#[test]
fn test_translate_accepts_numeric_conditions_and_float_weight() {
    let (alchemist, _) = with_mock(MockProvider::new().with_response(concat!(
        r#"Rule: {"type":"co-run","conditions":{"PriorityLevel":5},"#,
        r#""notWith":{"Category":["ICU"]},"weight":50.0}"#,
    )));

    let rule = alchemist
        .translate_rule("clients with priority 5 never alongside ICU")
        .expect("Translation failed");

    assert_eq!(
        rule,
        Rule::CoRun(
            CoRunRule::new(50)
                .with_condition("PriorityLevel", 5)
                .with_not_with("Category", vec!["ICU".to_string()])
        )
    );
}

// =============================================================================
// Fix Suggestions
// =============================================================================

#[test]
fn test_fix_suggestions_split_lines() {
    let (alchemist, mock) = with_mock(MockProvider::new().with_response(
        "\n1. Set PriorityLevel of C1 to 5.\n\n   2. Check WorkerID W1 slots.   \n\n",
    ));
    let dataset = sample_dataset();
    let issues = alchemist.validate_dataset(&dataset);

    let fixes = alchemist
        .suggest_fixes(&dataset, &issues)
        .expect("Fix suggestions failed");

    assert_eq!(
        fixes,
        vec!["1. Set PriorityLevel of C1 to 5.", "2. Check WorkerID W1 slots."]
    );

    let request = &mock.requests()[0];
    assert_eq!(request.temperature, Some(FIX_TEMPERATURE));
    assert!(request.prompt.contains("Invalid PriorityLevel for client C1"));
}

#[test]
fn test_fix_suggestions_empty_response() {
    let (alchemist, _) = with_mock(MockProvider::new().with_response("   \n\n"));

    let fixes = alchemist
        .suggest_fixes(&sample_dataset(), &[])
        .expect("Fix suggestions failed");
    assert!(fixes.is_empty());
}

#[test]
fn test_fix_suggestions_service_failure() {
    let (alchemist, _) = with_mock(MockProvider::new().with_failure("503 Service Unavailable"));

    let result = alchemist.suggest_fixes(&sample_dataset(), &[]);
    assert!(matches!(result, Err(AlchemistError::SuggestionService(_))));
}

#[test]
fn test_prompt_capped_at_limit() {
    let config = LlmConfig::default().with_prompt_char_limit(120);
    let (alchemist, mock) =
        with_mock(MockProvider::with_config(config).with_response("1. Fix it"));

    let dataset = Dataset::from_rows(
        (0..50)
            .map(|i| {
                let id = format!("C{}", i);
                raw(&[("ClientID", id.as_str()), ("ClientName", "Ünïcode Ltd")])
            })
            .collect(),
        vec![],
        vec![],
    );
    alchemist
        .suggest_fixes(&dataset, &[])
        .expect("Fix suggestions failed");

    assert_eq!(mock.requests()[0].prompt.chars().count(), 120);
}

// =============================================================================
// Natural Language Data Edit
// =============================================================================

#[test]
fn test_edit_replaces_only_present_collections() {
    let (alchemist, mock) = with_mock(MockProvider::new().with_response(
        r#"{"message":"Applied: set priority","clients":[{"ClientID":"C1","PriorityLevel":5}]}"#,
    ));
    let dataset = sample_dataset();

    let outcome = alchemist
        .apply_edit(&dataset, "set priority of C1 to 5")
        .expect("Edit failed");

    assert_eq!(outcome.message, "Applied: set priority");
    assert_eq!(outcome.replaced, vec![EntityKind::Client]);
    assert_eq!(outcome.dataset.clients[0].priority_level, CellValue::Number(5.0));
    assert_eq!(outcome.dataset.workers, dataset.workers);
    assert_eq!(outcome.dataset.tasks, dataset.tasks);

    // The caller's dataset is untouched.
    assert_eq!(dataset.clients[0].priority_level, CellValue::text("9"));
    assert_eq!(mock.requests()[0].temperature, Some(EDIT_TEMPERATURE));
}

#[test]
fn test_edit_rows_are_normalized() {
    let (alchemist, _) = with_mock(MockProvider::new().with_response(
        "```json\n{\"tasks\":[{\"task id\":\"T7\",\"category\":\"Ops\",\"Duration\":3}]}\n```",
    ));

    let outcome = alchemist
        .apply_edit(&sample_dataset(), "replace tasks")
        .expect("Edit failed");

    assert_eq!(outcome.message, "");
    let task = &outcome.dataset.tasks[0];
    assert_eq!(task.key(), Some("T7".to_string()));
    assert_eq!(task.category, CellValue::text("Ops"));
    assert_eq!(task.duration, CellValue::Number(3.0));
    assert_eq!(outcome.replaced, vec![EntityKind::Task]);
}

#[test]
fn test_edit_malformed_response() {
    let (alchemist, _) = with_mock(
        MockProvider::new().with_response("I updated the clients for you!"),
    );
    let dataset = sample_dataset();

    let result = alchemist.apply_edit(&dataset, "set priority of C1 to 5");
    assert!(matches!(result, Err(AlchemistError::MalformedEditResponse(_))));
}

#[test]
fn test_edit_service_failure() {
    let (alchemist, _) = with_mock(MockProvider::new().with_failure("connection reset"));

    let result = alchemist.apply_edit(&sample_dataset(), "anything");
    assert!(matches!(result, Err(AlchemistError::SuggestionService(_))));
}
