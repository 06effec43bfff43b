//! Alchemist: dataset validation and rule normalization for allocation data.
//!
//! Three related sheets (clients, workers, tasks) are imported with arbitrary
//! column naming, normalized onto a fixed schema, validated record by record,
//! and used to build a typed rule set for a downstream allocator.
//!
//! # Core Principles
//!
//! - **Always a report**: malformed data becomes [`ValidationIssue`]s, never an error
//! - **Caller-owned state**: datasets and rule sets are passed in and returned, never held
//! - **Untrusted model output**: text from an [`LlmProvider`] is parsed and checked before use
//!
//! # Example
//!
//! ```no_run
//! use alchemist::{Alchemist, Dataset, EntityKind, RuleSet};
//!
//! let alchemist = Alchemist::new();
//! let (tasks, _source) = alchemist.load("tasks.csv", EntityKind::Task).unwrap();
//! let dataset = Dataset::new().with_collection(tasks);
//!
//! for issue in alchemist.validate_dataset(&dataset) {
//!     println!("{}: {}", issue.record_key, issue.message);
//! }
//!
//! let mut rules = RuleSet::new();
//! for suggestion in alchemist.suggest_rules(&dataset) {
//!     rules.accept(suggestion);
//! }
//! println!("{}", alchemist.export_rule_set(&rules).to_json_pretty().unwrap());
//! ```

pub mod assist;
pub mod entity;
pub mod error;
pub mod input;
pub mod llm;
pub mod rules;
pub mod suggestion;
pub mod validation;

mod alchemist;

pub use crate::alchemist::{Alchemist, AlchemistConfig, DatasetReview};
pub use assist::{Assistant, EditOutcome};
pub use entity::{
    CellValue, ClientRecord, Dataset, EntityCollection, EntityKind, EntityRecord, RawRow,
    TaskRecord, WorkerRecord,
};
pub use error::{AlchemistError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata, normalize_header, normalize_headers};
pub use llm::{LlmConfig, LlmProvider, MockProvider, OpenAIProvider};
pub use rules::{Rule, RuleDocument, RuleDraft, RuleOrigin, RuleSet};
pub use suggestion::{RuleSuggestion, SuggestionConfig, SuggestionEngine};
pub use validation::{
    IssueKind, ValidationConfig, ValidationEngine, ValidationIssue, ValidationSummary,
};
