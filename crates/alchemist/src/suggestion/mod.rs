//! Heuristic rule suggestions.
//!
//! This module scans the current entity collections and proposes candidate
//! rules without an LLM. Suggestions are side-effect free: accepting one is
//! the caller's decision.

mod generator;
mod suggestion;

pub use generator::{SuggestionConfig, SuggestionEngine};
pub use suggestion::RuleSuggestion;
