use serde::{Deserialize, Serialize};

use super::enums::TurnRole;

/// One prior turn, resent by the caller on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

/// A clue the user selected on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceNode {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub insight: String,
}

/// Body of `POST /chat`.
///
/// Field names follow the canvas frontend (`chatHistory`, `contextNodes`);
/// `history` and `evidenceNodes` are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
    #[serde(rename = "chatHistory", alias = "history")]
    pub history: Vec<ChatTurn>,
    pub language: String,
    #[serde(rename = "contextNodes", alias = "evidenceNodes", default)]
    pub evidence_nodes: Vec<EvidenceNode>,
}
