//! Orchestration of the three model-backed operations.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::entity::Dataset;
use crate::error::{AlchemistError, Result};
use crate::llm::prompts::{self, EDIT_TEMPERATURE, FIX_TEMPERATURE, RULE_TEMPERATURE};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::rules::Rule;
use crate::validation::ValidationIssue;

use super::response::{EditOutcome, parse_edit_response, parse_fix_response, parse_rule_response};

/// Builds bounded prompts, calls the provider once, and parses the answer.
///
/// A failed call never changes anything the caller holds: every operation
/// borrows its input and returns fresh values.
#[derive(Clone)]
pub struct Assistant {
    provider: Arc<dyn LlmProvider>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Translate a natural-language statement into a rule.
    pub fn translate_rule(&self, statement: &str) -> Result<Rule> {
        let prompt = prompts::rule_prompt(statement);
        let response = self.request("translate_rule", prompt, RULE_TEMPERATURE)?;

        parse_rule_response(&response).inspect_err(|e| {
            warn!(
                provider = self.provider.name(),
                response_chars = response.chars().count(),
                error = %e,
                "rule translation rejected"
            );
        })
    }

    /// Ask for plain-text fixes for the given issues.
    pub fn suggest_fixes(
        &self,
        dataset: &Dataset,
        issues: &[ValidationIssue],
    ) -> Result<Vec<String>> {
        let prompt = prompts::fix_prompt(dataset, issues)?;
        let response = self.request("suggest_fixes", prompt, FIX_TEMPERATURE)?;

        let fixes = parse_fix_response(&response);
        debug!(issues = issues.len(), fixes = fixes.len(), "parsed fix suggestions");
        Ok(fixes)
    }

    /// Apply a natural-language edit command, returning the edited copy.
    pub fn apply_edit(&self, dataset: &Dataset, command: &str) -> Result<EditOutcome> {
        let prompt = prompts::edit_prompt(dataset, command)?;
        let response = self.request("apply_edit", prompt, EDIT_TEMPERATURE)?;

        let payload = parse_edit_response(&response).inspect_err(|e| {
            warn!(
                provider = self.provider.name(),
                response_chars = response.chars().count(),
                error = %e,
                "edit response rejected, dataset left unchanged"
            );
        })?;

        let outcome = payload.apply(dataset);
        debug!(replaced = ?outcome.replaced, "applied data edit");
        Ok(outcome)
    }

    /// Truncate, send, and normalize provider failures.
    fn request(&self, operation: &str, prompt: String, temperature: f64) -> Result<String> {
        let limit = self.provider.config().prompt_char_limit;
        let bounded = prompts::truncate_prompt(&prompt, limit);
        if bounded.len() < prompt.len() {
            debug!(
                operation,
                prompt_chars = prompt.chars().count(),
                limit,
                "prompt truncated"
            );
        }

        let request = CompletionRequest::new(bounded).with_temperature(temperature);
        self.provider.complete(&request).map_err(|e| {
            warn!(operation, provider = self.provider.name(), error = %e, "provider call failed");
            match e {
                AlchemistError::SuggestionService(_) => e,
                other => AlchemistError::SuggestionService(other.to_string()),
            }
        })
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("provider", &self.provider.name())
            .finish()
    }
}
