//! Adapters for external text-generation output.
//!
//! Three operations share one shape: build a bounded prompt from the current
//! state, make a single provider call, then parse and check the response
//! before anything is trusted.
//!
//! | Operation | Success | Failures |
//! |---|---|---|
//! | [`Assistant::translate_rule`] | a checked [`Rule`](crate::rules::Rule) | `NoStructuredOutput`, `MalformedRuleJson` |
//! | [`Assistant::suggest_fixes`] | trimmed non-blank lines | none beyond the provider |
//! | [`Assistant::apply_edit`] | an [`EditOutcome`] over a fresh dataset | `MalformedEditResponse` |
//!
//! Every provider failure surfaces as `SuggestionService`. Nothing is retried.

mod assistant;
mod extract;
mod response;

pub use assistant::Assistant;
pub use extract::{extract_json_object, strip_code_fence};
pub use response::{
    EditOutcome, EditPayload, parse_edit_response, parse_fix_response, parse_rule_response,
};
