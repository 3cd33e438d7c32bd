use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::extract::extract_json;
use super::prompt::build_messages;
use super::schema::response_format;
use super::types::{ChatCompletion, CompletionRequest};
use super::validate::validate_chat_response;
use super::CanvasError;
use crate::config::{SchemaMode, CHAT_MODEL, CHAT_TEMPERATURE};
use crate::models::{ChatRequest, ChatResponse};

/// One chat turn end to end: build messages, one completion call,
/// recover JSON, validate. No retry and no repair at any stage.
pub struct CanvasPipeline {
    client: Arc<dyn ChatCompletion>,
    schema_mode: SchemaMode,
}

impl CanvasPipeline {
    pub fn new(client: Arc<dyn ChatCompletion>, schema_mode: SchemaMode) -> Self {
        Self {
            client,
            schema_mode,
        }
    }

    pub fn schema_mode(&self) -> SchemaMode {
        self.schema_mode
    }

    /// Completion request for a chat turn, ready to send.
    pub fn completion_request(&self, request: &ChatRequest) -> CompletionRequest {
        CompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: build_messages(request),
            temperature: CHAT_TEMPERATURE,
            response_format: response_format(self.schema_mode),
        }
    }

    pub async fn process(&self, request: &ChatRequest) -> Result<ChatResponse, CanvasError> {
        let span = tracing::info_span!(
            "canvas_turn",
            request_id = %Uuid::new_v4(),
            language = %request.language,
            history = request.history.len(),
            clues = request.evidence_nodes.len(),
        );

        async {
            let completion = self.completion_request(request);
            let raw = self.client.complete(&completion).await.map_err(|e| {
                tracing::error!(error = %e, "Chat completion failed");
                e
            })?;
            tracing::debug!(chars = raw.chars().count(), "Received model output");

            let value = extract_json(&raw)?;
            let response = validate_chat_response(&value).map_err(|e| {
                tracing::warn!(error = %e, "Model output failed validation");
                e
            })?;

            tracing::info!(
                mood = %response.soundtrack_mood,
                create_node = response.visualization.should_create_node,
                options = response.profiling_options.as_ref().map_or(0, Vec::len),
                "Chat turn complete"
            );
            Ok(response)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageRole, SoundtrackMood};
    use crate::pipeline::canvas::client::{MockCompletionClient, MockReply};
    use crate::pipeline::upstream::UpstreamError;
    use serde_json::json;

    const REPLY: &str = r#"{
  "chatResponse": "A door you keep walking past.",
  "visualization": {
    "shouldCreateNode": true,
    "title": "The Locked Door",
    "insight": "A threshold the self refuses to cross",
    "visualKeyword": "Surrealism, heavy oak door, chains, cold light"
  },
  "soundtrackMood": "mystery"
}"#;

    fn request() -> ChatRequest {
        serde_json::from_value(json!({
            "userPrompt": "I keep dreaming of locked doors",
            "chatHistory": [
                {"role": "user", "content": "hi"},
                {"role": "model", "content": "hello"}
            ],
            "language": "en"
        }))
        .unwrap()
    }

    fn pipeline(mock: Arc<MockCompletionClient>, mode: SchemaMode) -> CanvasPipeline {
        CanvasPipeline::new(mock, mode)
    }

    #[tokio::test]
    async fn fenced_reply_becomes_response() {
        let mock = Arc::new(MockCompletionClient::replying(&format!("```json\n{REPLY}\n```")));
        let response = pipeline(mock, SchemaMode::JsonSchema)
            .process(&request())
            .await
            .unwrap();

        assert_eq!(response.soundtrack_mood, SoundtrackMood::Mystery);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::from_str::<serde_json::Value>(REPLY).unwrap()
        );
    }

    #[tokio::test]
    async fn sends_model_settings_and_messages() {
        let mock = Arc::new(MockCompletionClient::replying(REPLY));
        pipeline(mock.clone(), SchemaMode::JsonObject)
            .process(&request())
            .await
            .unwrap();

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        let req = &sent[0];
        assert_eq!(req.model, CHAT_MODEL);
        assert_eq!(req.temperature, CHAT_TEMPERATURE);
        assert_eq!(req.response_format, Some(json!({"type": "json_object"})));

        let roles: Vec<MessageRole> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(req.messages[3].content, "I keep dreaming of locked doors");
    }

    #[tokio::test]
    async fn schema_mode_off_omits_response_format() {
        let mock = Arc::new(MockCompletionClient::replying(REPLY));
        pipeline(mock.clone(), SchemaMode::Off)
            .process(&request())
            .await
            .unwrap();
        assert!(mock.requests()[0].response_format.is_none());
    }

    #[tokio::test]
    async fn upstream_failure_passes_through() {
        let mock = Arc::new(MockCompletionClient::new(MockReply::Status {
            status: 429,
            body: "quota".into(),
        }));
        let err = pipeline(mock, SchemaMode::JsonSchema)
            .process(&request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CanvasError::Upstream(UpstreamError::Status { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn unparseable_reply_is_parse_failure() {
        let mock = Arc::new(MockCompletionClient::replying("I'd rather not."));
        let err = pipeline(mock, SchemaMode::JsonSchema)
            .process(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CanvasError::JsonParsing { .. }));
    }

    #[tokio::test]
    async fn invalid_mood_is_validation_failure() {
        let reply = REPLY.replace("mystery", "cheerful");
        let mock = Arc::new(MockCompletionClient::replying(&reply));
        let err = pipeline(mock, SchemaMode::JsonSchema)
            .process(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CanvasError::Validation { ref field, .. } if field == "soundtrackMood"));
    }

    #[tokio::test]
    async fn each_turn_makes_exactly_one_call() {
        let mock = Arc::new(MockCompletionClient::replying("not json"));
        let _ = pipeline(mock.clone(), SchemaMode::JsonSchema)
            .process(&request())
            .await;
        assert_eq!(mock.requests().len(), 1);
    }
}
