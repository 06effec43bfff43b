//! Parsers turning untrusted model output into typed results.
//!
//! Each parser has its own failure mode and never touches caller state:
//! an edit that fails to parse leaves the dataset exactly as it was.

use serde::Deserialize;
use serde_json::Value;

use crate::entity::{Dataset, EntityCollection, EntityKind, RawRow};
use crate::error::{AlchemistError, Result};
use crate::rules::Rule;

use super::extract::{extract_json_object, strip_code_fence};

/// Parse a natural-language-to-rule response.
///
/// The first `{...}` object is extracted from the surrounding text and must
/// deserialize as a [`Rule`] with a weight in range.
pub fn parse_rule_response(response: &str) -> Result<Rule> {
    let object = extract_json_object(response).ok_or(AlchemistError::NoStructuredOutput)?;

    let value: Value = serde_json::from_str(object)
        .map_err(|e| AlchemistError::MalformedRuleJson(format!("invalid JSON: {}", e)))?;
    let rule: Rule = serde_json::from_value(value)
        .map_err(|e| AlchemistError::MalformedRuleJson(e.to_string()))?;
    rule.check().map_err(AlchemistError::MalformedRuleJson)?;

    Ok(rule)
}

/// Split a fix-suggestion response into trimmed, non-blank lines.
pub fn parse_fix_response(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A parsed data-edit response. Absent collections are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EditPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub clients: Option<Vec<RawRow>>,
    #[serde(default)]
    pub workers: Option<Vec<RawRow>>,
    #[serde(default)]
    pub tasks: Option<Vec<RawRow>>,
}

/// The result of applying an edit: a fresh dataset plus what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub dataset: Dataset,
    /// The model's summary of the edit, empty when it gave none.
    pub message: String,
    /// Collections that were replaced, in client, worker, task order.
    pub replaced: Vec<EntityKind>,
}

impl EditPayload {
    /// Replace each present collection wholesale in a copy of `dataset`.
    ///
    /// Rows are header-normalized and typed on the way in.
    pub fn apply(self, dataset: &Dataset) -> EditOutcome {
        let mut edited = dataset.clone();
        let mut replaced = Vec::new();

        let collections = [
            (EntityKind::Client, self.clients),
            (EntityKind::Worker, self.workers),
            (EntityKind::Task, self.tasks),
        ];
        for (kind, rows) in collections {
            if let Some(rows) = rows {
                edited = edited.with_collection(EntityCollection::from_rows(kind, rows));
                replaced.push(kind);
            }
        }

        EditOutcome {
            dataset: edited,
            message: self.message.unwrap_or_default(),
            replaced,
        }
    }
}

/// Parse a data-edit response.
///
/// Accepts a bare JSON object, one wrapped in a markdown code fence, or one
/// embedded in prose. Anything else is [`AlchemistError::MalformedEditResponse`].
pub fn parse_edit_response(response: &str) -> Result<EditPayload> {
    let body = strip_code_fence(response);

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(first) => extract_json_object(body)
            .and_then(|object| serde_json::from_str(object).ok())
            .ok_or_else(|| AlchemistError::MalformedEditResponse(first.to_string()))?,
    };

    if !value.is_object() {
        return Err(AlchemistError::MalformedEditResponse(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AlchemistError::MalformedEditResponse(e.to_string()))
}
