//! Validation issue types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Category of a data-quality problem.
///
/// All categories are recoverable: they are reported and validation
/// continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Key absent, or a cell holding the empty string.
    FieldMissing,
    /// Numeric field that is non-numeric or outside its allowed range.
    FieldOutOfRange,
    /// Second or later occurrence of a key within one collection.
    DuplicateKey,
    /// Structured-text field that cannot be parsed into its expected shape.
    MalformedStructuredField,
    /// Reference to a record that does not exist in the related collection.
    UnknownReference,
}

impl IssueKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::FieldMissing => "Field Missing",
            IssueKind::FieldOutOfRange => "Field Out Of Range",
            IssueKind::DuplicateKey => "Duplicate Key",
            IssueKind::MalformedStructuredField => "Malformed Structured Field",
            IssueKind::UnknownReference => "Unknown Reference",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single reported validation problem tied to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Entity kind of the offending record.
    pub entity: EntityKind,
    /// Key of the record, or `row N` (1-based) when the key is missing.
    pub record_key: String,
    /// Field the issue is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Issue category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(
        entity: EntityKind,
        record_key: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            record_key: record_key.into(),
            field: None,
            kind,
            message: message.into(),
        }
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Counts of issues by entity and by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of issues.
    pub total: usize,
    /// Issues per entity kind.
    pub by_entity: BTreeMap<EntityKind, usize>,
    /// Issues per issue kind.
    pub by_kind: BTreeMap<IssueKind, usize>,
}

impl ValidationSummary {
    /// Summarize an issue list.
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            *summary.by_entity.entry(issue.entity).or_insert(0) += 1;
            *summary.by_kind.entry(issue.kind).or_insert(0) += 1;
        }
        summary
    }

    /// True when no issues were reported.
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}
