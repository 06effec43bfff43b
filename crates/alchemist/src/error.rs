//! Error types for the Alchemist library.
//!
//! Data-quality problems are never errors: they are reported as
//! [`ValidationIssue`](crate::validation::ValidationIssue)s. The variants here
//! cover ingestion, configuration and the external-response adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Alchemist operations.
#[derive(Debug, Error)]
pub enum AlchemistError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule failed structural checks (unknown type, weight out of range).
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// The model response contained no `{...}` object at all.
    #[error("No JSON object found in model response")]
    NoStructuredOutput,

    /// A JSON object was found but it is not a well-formed rule.
    #[error("Invalid rule format from model: {0}")]
    MalformedRuleJson(String),

    /// A data-edit response could not be parsed; nothing was applied.
    #[error("Malformed edit response: {0}")]
    MalformedEditResponse(String),

    /// The text-generation service failed (transport, status, or empty body).
    #[error("Suggestion service error: {0}")]
    SuggestionService(String),
}

/// Result type alias for Alchemist operations.
pub type Result<T> = std::result::Result<T, AlchemistError>;
