use serde::{Deserialize, Serialize};

use super::enums::SoundtrackMood;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub should_create_node: bool,
    pub title: String,
    pub insight: String,
    /// English, comma-separated; fed to the image generator.
    pub visual_keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_label: Option<String>,
}

/// A selectable interpretation offered back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilingOption {
    /// Expected to be a single letter: A, B or C.
    pub id: String,
    pub label: String,
    pub description: String,
    pub visual_keyword: String,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub chat_response: String,
    pub visualization: Visualization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiling_options: Option<Vec<ProfilingOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_header: Option<String>,
    pub soundtrack_mood: SoundtrackMood,
}
