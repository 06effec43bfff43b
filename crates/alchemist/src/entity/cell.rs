//! Raw cell values and the structured-field parsers shared by validation
//! and rule suggestion.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single untyped row as delivered by an ingester or by a model response.
pub type RawRow = IndexMap<String, CellValue>;

/// A raw cell value.
///
/// Untagged so rows deserialize straight from JSON: `null` becomes
/// [`CellValue::Empty`], numbers and strings map to their variants, and
/// arrays/objects/booleans are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent column or explicit null.
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl CellValue {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// True when the cell holds exactly the empty string.
    ///
    /// Absent/null cells are not "empty cells"; required-field checks cover
    /// those separately. Whitespace-only text is content.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Render the cell as display text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(format_number(*n)),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::List(items) => Cow::Owned(
                items
                    .iter()
                    .map(value_as_text)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            CellValue::Object(map) => Cow::Owned(Value::Object(map.clone()).to_string()),
        }
    }

    /// Trimmed, non-empty text suitable for use as a record key.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }

    /// Interpret the cell as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Interpret the cell as a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(whole)
    }

    /// Parse the cell as a list of phase indices.
    ///
    /// Strict JSON array first; if the text is not a JSON array, fall back to
    /// comma-separated tokens. Returns `None` when neither shape yields a list
    /// of whole numbers. Blank or absent cells parse to an empty list.
    pub fn parse_phase_list(&self) -> Option<Vec<i64>> {
        match self {
            CellValue::Empty => Some(Vec::new()),
            CellValue::Number(n) => whole(*n).map(|p| vec![p]),
            CellValue::List(items) => items.iter().map(value_as_integer).collect(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Some(Vec::new());
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => items.iter().map(value_as_integer).collect(),
                    Ok(Value::Number(n)) => n.as_f64().and_then(whole).map(|p| vec![p]),
                    _ => split_tokens(trimmed)
                        .map(|token| parse_number(token).and_then(whole))
                        .collect(),
                }
            }
            CellValue::Bool(_) | CellValue::Object(_) => None,
        }
    }

    /// Parse the cell as a list of free-text tokens (IDs, skills).
    ///
    /// Same policy as [`parse_phase_list`](Self::parse_phase_list) but tokens
    /// are kept as strings; empty tokens are dropped.
    pub fn parse_text_list(&self) -> Option<Vec<String>> {
        match self {
            CellValue::Empty => Some(Vec::new()),
            CellValue::Number(n) => Some(vec![format_number(*n)]),
            CellValue::List(items) => items.iter().map(value_as_token).collect(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => items.iter().map(value_as_token).collect(),
                    _ => Some(
                        split_tokens(trimmed)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ),
                }
            }
            CellValue::Bool(_) | CellValue::Object(_) => None,
        }
    }

    /// Parse the cell as a JSON object.
    pub fn parse_json_object(&self) -> Option<Map<String, Value>> {
        match self {
            CellValue::Object(map) => Some(map.clone()),
            CellValue::Text(s) => match serde_json::from_str::<Value>(s.trim()) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim)
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn whole(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0).then_some(n as i64)
}

fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(whole),
        Value::String(s) => parse_number(s).and_then(whole),
        _ => None,
    }
}

fn value_as_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    match whole(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}
