use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::CanvasError;
use crate::models::MessageRole;

/// One message of the outgoing completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// Chat-completion provider abstraction (allows mocking).
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Raw text content of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CanvasError>;
}
