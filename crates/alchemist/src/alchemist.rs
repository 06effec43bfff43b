//! Main Alchemist struct and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assist::{Assistant, EditOutcome};
use crate::entity::{Dataset, EntityCollection, EntityKind, RawRow};
use crate::error::{AlchemistError, Result};
use crate::input::{Parser, ParserConfig, SourceMetadata, normalize_headers};
use crate::llm::LlmProvider;
use crate::rules::{Rule, RuleDocument, RuleOrigin, RuleSet};
use crate::suggestion::{RuleSuggestion, SuggestionConfig, SuggestionEngine};
use crate::validation::{ValidationConfig, ValidationEngine, ValidationIssue, ValidationSummary};

/// Configuration for an Alchemist session.
#[derive(Debug, Clone, Default)]
pub struct AlchemistConfig {
    /// Sheet parser configuration.
    pub parser: ParserConfig,
    /// Field ranges and reference checking.
    pub validation: ValidationConfig,
    /// Rule suggestion thresholds.
    pub suggestion: SuggestionConfig,
}

impl AlchemistConfig {
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_suggestion(mut self, suggestion: SuggestionConfig) -> Self {
        self.suggestion = suggestion;
        self
    }
}

/// Result of reviewing a whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReview {
    /// Issues across all collections, clients first.
    pub issues: Vec<ValidationIssue>,
    /// Issue counts.
    pub summary: ValidationSummary,
    /// Candidate rules. Not yet part of any rule set.
    pub suggestions: Vec<RuleSuggestion>,
}

/// The main validation and rule normalization engine.
///
/// Holds no session state: datasets and rule sets are owned by the caller,
/// passed in, and returned as new values.
pub struct Alchemist {
    config: AlchemistConfig,
    parser: Parser,
    validation: ValidationEngine,
    suggestion: SuggestionEngine,
    assistant: Option<Assistant>,
}

impl Alchemist {
    /// Create a new Alchemist instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AlchemistConfig::default())
    }

    /// Create an Alchemist instance with custom configuration.
    pub fn with_config(config: AlchemistConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let validation = ValidationEngine::with_config(config.validation.clone());
        let suggestion = SuggestionEngine::with_config(config.suggestion.clone());

        Self {
            config,
            parser,
            validation,
            suggestion,
            assistant: None,
        }
    }

    /// Add an LLM provider, enabling rule translation, fix suggestions and
    /// natural-language edits.
    pub fn with_llm(self, provider: impl LlmProvider + 'static) -> Self {
        self.with_shared_llm(Arc::new(provider))
    }

    /// Add an LLM provider that is shared with other owners.
    pub fn with_shared_llm(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.assistant = Some(Assistant::new(provider));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &AlchemistConfig {
        &self.config
    }

    /// True when an LLM provider is attached.
    pub fn has_llm(&self) -> bool {
        self.assistant.is_some()
    }

    // =========================================================================
    // Ingestion and validation
    // =========================================================================

    /// Load a CSV/TSV sheet as a typed collection of `kind`.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        kind: EntityKind,
    ) -> Result<(EntityCollection, SourceMetadata)> {
        self.parser.parse_file(path, kind)
    }

    /// Map raw column names onto the canonical names for `kind`.
    pub fn normalize_headers<S: AsRef<str>>(&self, raw: &[S], kind: EntityKind) -> Vec<String> {
        normalize_headers(raw, kind)
    }

    /// Validate one typed collection.
    pub fn validate(&self, collection: &EntityCollection) -> Vec<ValidationIssue> {
        self.validation.validate(collection)
    }

    /// Normalize, type and validate raw ingested rows.
    pub fn validate_rows(&self, kind: EntityKind, rows: Vec<RawRow>) -> Vec<ValidationIssue> {
        self.validation.validate_rows(kind, rows)
    }

    /// Validate all three collections and their cross references.
    pub fn validate_dataset(&self, dataset: &Dataset) -> Vec<ValidationIssue> {
        self.validation.validate_dataset(dataset)
    }

    /// Validate the dataset and propose rules in one pass.
    pub fn review(&self, dataset: &Dataset) -> DatasetReview {
        let issues = self.validate_dataset(dataset);
        let summary = ValidationSummary::from_issues(&issues);
        let suggestions = self.suggest_rules(dataset);

        debug!(
            records = dataset.record_count(),
            issues = summary.total,
            suggestions = suggestions.len(),
            "reviewed dataset"
        );
        for (kind, count) in &summary.by_kind {
            debug!(kind = %kind, count, "issues by kind");
        }

        DatasetReview {
            issues,
            summary,
            suggestions,
        }
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Heuristic rule candidates for the dataset.
    pub fn suggest_rules(&self, dataset: &Dataset) -> Vec<RuleSuggestion> {
        self.suggestion.suggest(dataset)
    }

    /// Append a hand-entered rule.
    pub fn add_rule(&self, rule_set: RuleSet, rule: Rule) -> RuleSet {
        rule_set.add_rule(rule, RuleOrigin::Manual)
    }

    /// The `{ "rules": [...] }` document handed to the allocator.
    pub fn export_rule_set(&self, rule_set: &RuleSet) -> RuleDocument {
        rule_set.export()
    }

    // =========================================================================
    // Model-backed operations
    // =========================================================================

    /// Translate a natural-language statement into a checked rule.
    pub fn translate_rule(&self, statement: &str) -> Result<Rule> {
        self.assistant()?.translate_rule(statement)
    }

    /// Ask the model for plain-text fixes for `issues`.
    pub fn suggest_fixes(
        &self,
        dataset: &Dataset,
        issues: &[ValidationIssue],
    ) -> Result<Vec<String>> {
        self.assistant()?.suggest_fixes(dataset, issues)
    }

    /// Apply a natural-language edit command to a copy of the dataset.
    pub fn apply_edit(&self, dataset: &Dataset, command: &str) -> Result<EditOutcome> {
        self.assistant()?.apply_edit(dataset, command)
    }

    fn assistant(&self) -> Result<&Assistant> {
        self.assistant
            .as_ref()
            .ok_or_else(|| AlchemistError::Config("no LLM provider configured".to_string()))
    }
}

impl Default for Alchemist {
    fn default() -> Self {
        Self::new()
    }
}
