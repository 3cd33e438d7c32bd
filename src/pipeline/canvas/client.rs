use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ChatCompletion, CompletionRequest};
use super::CanvasError;
use crate::pipeline::upstream::{UpstreamClient, UpstreamError};

pub const COMPLETIONS_PATH: &str = "/chat/completions";

/// OpenAI-compatible chat completion client for AI Studio.
#[derive(Debug, Clone)]
pub struct AiStudioChatClient {
    upstream: UpstreamClient,
}

impl AiStudioChatClient {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl ChatCompletion for AiStudioChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CanvasError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "Sending chat completion"
        );

        let body = self.upstream.post_json(COMPLETIONS_PATH, request).await?;
        Ok(first_choice_content(&body)?)
    }
}

/// `choices[0].message.content`, trimmed.
fn first_choice_content(body: &Value) -> Result<String, UpstreamError> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            UpstreamError::Malformed("missing choices[0].message.content".to_string())
        })
}

/// Canned outcome for [`MockCompletionClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Content(String),
    Status { status: u16, body: String },
    Connectivity(String),
    Malformed(String),
}

/// In-memory completion client. Returns one fixed outcome and records
/// every request it receives.
#[derive(Debug)]
pub struct MockCompletionClient {
    reply: MockReply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(content: &str) -> Self {
        Self::new(MockReply::Content(content.to_string()))
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatCompletion for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CanvasError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        let err = match &self.reply {
            MockReply::Content(text) => return Ok(text.clone()),
            MockReply::Status { status, body } => UpstreamError::Status {
                status: *status,
                body: body.clone(),
            },
            MockReply::Connectivity(msg) => UpstreamError::Connectivity(msg.clone()),
            MockReply::Malformed(msg) => UpstreamError::Malformed(msg.clone()),
        };
        Err(err.into())
    }
}
