//! Locating structured payloads inside free-text model output.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").unwrap());

// =============================================================================
// EXTRACTION
// =============================================================================

/// Return the body of the first markdown code fence, or the trimmed input
/// when there is none.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text.trim(),
    }
}

/// Find the first `{...}` object substring in `text`.
///
/// The scan starts at the first `{` and tracks nesting, ignoring braces
/// inside JSON strings. If that object never closes, the span from the first
/// `{` to the last `}` is returned instead so the caller can report it as
/// malformed. `None` means there is no `{`/`}` pair at all.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    balanced_end(&text[start..])
        .map(|len| &text[start..start + len])
        .or_else(|| {
            let end = text.rfind('}')?;
            (end > start).then(|| &text[start..=end])
        })
}

/// Byte length of the balanced object at the head of `text`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
