//! Prompt templates for LLM interactions.

use crate::entity::Dataset;
use crate::error::Result;
use crate::validation::ValidationIssue;

/// Sampling temperature for rule translation.
pub const RULE_TEMPERATURE: f64 = 0.2;

/// Sampling temperature for fix suggestions.
pub const FIX_TEMPERATURE: f64 = 0.3;

/// Sampling temperature for data edits.
pub const EDIT_TEMPERATURE: f64 = 0.3;

/// Build the prompt translating a natural-language statement into one rule.
pub fn rule_prompt(statement: &str) -> String {
    format!(
        r#"You are a rule converter. Convert the following natural language statement into a JSON rule object.
Allowed types: "co-run", "load-limit", "slot-restriction", "phase-window". Every rule has an integer "weight" from 0 to 100.
Example:
"Tasks of category Surgery must not run with tasks of category ICU" =>
{{
  "type": "co-run",
  "conditions": {{ "Category": "Surgery" }},
  "notWith": {{ "Category": ["ICU"] }},
  "weight": 50
}}

Statement: {}
JSON:"#,
        statement.trim()
    )
}

/// Build the prompt asking for plain-text fixes of validation issues.
pub fn fix_prompt(dataset: &Dataset, issues: &[ValidationIssue]) -> Result<String> {
    Ok(format!(
        "You're a smart validator. Given the following dataset and validation errors, suggest possible fixes in plain text.\n\
         Clients: {}\n\
         Workers: {}\n\
         Tasks: {}\n\
         Errors: {}\n\
         Fix Suggestions:",
        serde_json::to_string(&dataset.clients)?,
        serde_json::to_string(&dataset.workers)?,
        serde_json::to_string(&dataset.tasks)?,
        serde_json::to_string(issues)?,
    ))
}

/// Build the prompt applying a natural-language edit command to the dataset.
pub fn edit_prompt(dataset: &Dataset, command: &str) -> Result<String> {
    Ok(format!(
        r#"You are a helpful data editor. Given the dataset and a natural language command, apply the command to the data. Return a JSON object with modified "clients", "workers", or "tasks". Omit collections you did not change.

Command: {}
Clients: {}
Workers: {}
Tasks: {}

Respond in this format:
{{
  "message": "Applied: ...",
  "clients": [...],
  "workers": [...],
  "tasks": [...]
}}"#,
        command.trim(),
        serde_json::to_string(&dataset.clients)?,
        serde_json::to_string(&dataset.workers)?,
        serde_json::to_string(&dataset.tasks)?,
    ))
}

/// Cut a prompt to at most `limit` characters, on a char boundary.
pub fn truncate_prompt(prompt: &str, limit: usize) -> &str {
    match prompt.char_indices().nth(limit) {
        Some((end, _)) => &prompt[..end],
        None => prompt,
    }
}
