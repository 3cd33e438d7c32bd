use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::CanvasError;

/// Characters of offending text kept in parse-failure diagnostics.
pub const PREVIEW_CHARS: usize = 200;

/// Greedy: first `{` to last `}`, across lines.
static OBJECT_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Remove a surrounding triple-backtick fence, labeled (```` ```json ````) or not.
///
/// Unfenced text is only trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Info string such as `json` directly after the opening marker.
    let label_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = rest[label_len..].trim();

    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Recover a JSON value from raw model output.
///
/// Strict parse of the fence-stripped text first; on failure, one more
/// attempt on the widest `{...}` span. Anything else is a parse failure.
pub fn extract_json(raw: &str) -> Result<Value, CanvasError> {
    let content = strip_fences(raw);

    let strict_err = match serde_json::from_str::<Value>(content) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let preview = preview(content);
    tracing::warn!(
        error = %strict_err,
        preview = %preview,
        "Model output is not bare JSON, searching for an embedded object"
    );

    let Some(span) = OBJECT_SPAN.find(content) else {
        return Err(CanvasError::JsonParsing {
            message: strict_err.to_string(),
            preview,
        });
    };

    serde_json::from_str::<Value>(span.as_str()).map_err(|e| CanvasError::JsonParsing {
        message: e.to_string(),
        preview,
    })
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
