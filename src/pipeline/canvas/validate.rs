// Maps the recovered JSON value onto the strict ChatResponse contract.
// Required fields must be present with the right type; optional fields
// that are absent or null stay unset; unknown fields are ignored.

use serde_json::{Map, Value};

use super::CanvasError;
use crate::models::{ChatResponse, ProfilingOption, SoundtrackMood, Visualization};

/// Profiling option ids the prompt asks for.
const OPTION_IDS: &[&str] = &["A", "B", "C"];

/// Validate a recovered value and build the response returned to callers.
pub fn validate_chat_response(value: &Value) -> Result<ChatResponse, CanvasError> {
    let root = as_object(value, "$")?;

    let chat_response = required_str(root, "", "chatResponse")?;
    let visualization = validate_visualization(required(root, "", "visualization")?)?;
    let profiling_options = match optional(root, "profilingOptions") {
        Some(v) => Some(validate_options(v)?),
        None => None,
    };
    let options_header = optional_str(root, "", "optionsHeader")?;
    let soundtrack_mood = validate_mood(required(root, "", "soundtrackMood")?)?;

    Ok(ChatResponse {
        chat_response,
        visualization,
        profiling_options,
        options_header,
        soundtrack_mood,
    })
}

fn validate_visualization(value: &Value) -> Result<Visualization, CanvasError> {
    const PATH: &str = "visualization.";
    let obj = as_object(value, "visualization")?;

    let should_create_node = match required(obj, PATH, "shouldCreateNode")? {
        Value::Bool(b) => *b,
        other => {
            return Err(CanvasError::validation(
                "visualization.shouldCreateNode",
                format!("expected boolean, found {}", kind(other)),
            ))
        }
    };

    Ok(Visualization {
        should_create_node,
        title: required_str(obj, PATH, "title")?,
        insight: required_str(obj, PATH, "insight")?,
        visual_keyword: required_str(obj, PATH, "visualKeyword")?,
        connection_label: optional_str(obj, PATH, "connectionLabel")?,
    })
}

fn validate_options(value: &Value) -> Result<Vec<ProfilingOption>, CanvasError> {
    let Value::Array(items) = value else {
        return Err(CanvasError::validation(
            "profilingOptions",
            format!("expected array, found {}", kind(value)),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("profilingOptions[{i}].");
            let obj = as_object(item, path.trim_end_matches('.'))?;
            let option = ProfilingOption {
                id: required_str(obj, &path, "id")?,
                label: required_str(obj, &path, "label")?,
                description: required_str(obj, &path, "description")?,
                visual_keyword: required_str(obj, &path, "visualKeyword")?,
            };
            if !OPTION_IDS.contains(&option.id.as_str()) {
                tracing::warn!(index = i, id = %option.id, "Profiling option id is not A, B or C");
            }
            Ok(option)
        })
        .collect()
}

fn validate_mood(value: &Value) -> Result<SoundtrackMood, CanvasError> {
    let Value::String(s) = value else {
        return Err(CanvasError::validation(
            "soundtrackMood",
            format!("expected string, found {}", kind(value)),
        ));
    };
    s.parse().map_err(|_| {
        let allowed: Vec<&str> = SoundtrackMood::ALL.iter().map(|m| m.as_str()).collect();
        CanvasError::validation(
            "soundtrackMood",
            format!("{s:?} is not one of {}", allowed.join(", ")),
        )
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, CanvasError> {
    value.as_object().ok_or_else(|| {
        CanvasError::validation(path, format!("expected object, found {}", kind(value)))
    })
}

/// Present and not null.
fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    prefix: &str,
    key: &str,
) -> Result<&'a Value, CanvasError> {
    optional(obj, key)
        .ok_or_else(|| CanvasError::validation(format!("{prefix}{key}"), "field is required"))
}

fn required_str(obj: &Map<String, Value>, prefix: &str, key: &str) -> Result<String, CanvasError> {
    expect_str(required(obj, prefix, key)?, prefix, key)
}

fn optional_str(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
) -> Result<Option<String>, CanvasError> {
    optional(obj, key)
        .map(|v| expect_str(v, prefix, key))
        .transpose()
}

fn expect_str(value: &Value, prefix: &str, key: &str) -> Result<String, CanvasError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(CanvasError::validation(
            format!("{prefix}{key}"),
            format!("expected string, found {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
