//! Entity validation: per-record checks and duplicate-key detection.

mod issue;
mod validators;

pub use issue::{IssueKind, ValidationIssue, ValidationSummary};
pub use validators::{
    ClientValidator, RecordScope, TaskValidator, ValidationConfig, ValidationEngine, Validator,
    WorkerValidator, check_requested_tasks,
};
