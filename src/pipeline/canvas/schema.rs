use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::config::SchemaMode;
use crate::models::SoundtrackMood;

/// Name the schema is registered under in `response_format`.
pub const RESPONSE_SCHEMA_NAME: &str = "inner_canvas_response";

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let moods: Vec<&str> = SoundtrackMood::ALL.iter().map(|m| m.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "chatResponse": {"type": "string"},
            "visualization": {
                "type": "object",
                "properties": {
                    "shouldCreateNode": {"type": "boolean"},
                    "title": {"type": "string"},
                    "insight": {"type": "string"},
                    "visualKeyword": {"type": "string"},
                    "connectionLabel": {"type": "string"}
                },
                "required": ["shouldCreateNode", "title", "insight", "visualKeyword"]
            },
            "optionsHeader": {"type": "string"},
            "profilingOptions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Option ID, must be a single letter: A, B, or C"
                        },
                        "label": {"type": "string"},
                        "description": {"type": "string"},
                        "visualKeyword": {"type": "string"}
                    },
                    "required": ["id", "label", "description", "visualKeyword"]
                }
            },
            "soundtrackMood": {
                "type": "string",
                "enum": moods
            }
        },
        "required": ["chatResponse", "visualization", "soundtrackMood"]
    })
});

/// Structural hint of the `ChatResponse` object. Never used to validate.
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

/// `response_format` value for the configured mode; `None` omits the field.
pub fn response_format(mode: SchemaMode) -> Option<Value> {
    match mode {
        SchemaMode::JsonSchema => Some(json!({
            "type": "json_schema",
            "json_schema": {
                "name": RESPONSE_SCHEMA_NAME,
                "schema": response_schema()
            }
        })),
        SchemaMode::JsonObject => Some(json!({"type": "json_object"})),
        SchemaMode::Off => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_requires_contract_fields() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            json!(["chatResponse", "visualization", "soundtrackMood"])
        );
        assert_eq!(
            schema["properties"]["visualization"]["required"],
            json!(["shouldCreateNode", "title", "insight", "visualKeyword"])
        );
    }

    #[test]
    fn optional_fields_are_declared_but_not_required() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(schema["properties"].get("optionsHeader").is_some());
        assert!(!required.contains(&json!("optionsHeader")));
        assert!(!required.contains(&json!("profilingOptions")));

        let vis_required = schema["properties"]["visualization"]["required"]
            .as_array()
            .unwrap();
        assert!(!vis_required.contains(&json!("connectionLabel")));
    }

    #[test]
    fn mood_enum_lists_all_five() {
        let moods = &response_schema()["properties"]["soundtrackMood"]["enum"];
        assert_eq!(
            moods,
            &json!(["neutral", "mystery", "tension", "melancholy", "epiphany"])
        );
    }

    #[test]
    fn response_format_per_mode() {
        let full = response_format(SchemaMode::JsonSchema).unwrap();
        assert_eq!(full["type"], "json_schema");
        assert_eq!(full["json_schema"]["name"], RESPONSE_SCHEMA_NAME);
        assert_eq!(&full["json_schema"]["schema"], response_schema());

        let plain = response_format(SchemaMode::JsonObject).unwrap();
        assert_eq!(plain, json!({"type": "json_object"}));

        assert!(response_format(SchemaMode::Off).is_none());
    }
}
