//! Node illustration: keyword in, PNG data URI out.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{IMAGE_MODEL, IMAGE_SIZE};
use crate::models::ImageResponse;
use crate::pipeline::upstream::{UpstreamClient, UpstreamError};

pub const GENERATIONS_PATH: &str = "/images/generations";

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("No image generated")]
    NoImage,
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub response_format: String,
    pub size: String,
    pub n: u32,
}

/// Image provider abstraction (allows mocking).
#[async_trait]
pub trait ImageGeneration: Send + Sync {
    /// Base64 payload of the first generated image, `None` if the
    /// provider returned no images.
    async fn generate(&self, request: &ImageGenerationRequest)
        -> Result<Option<String>, ImagingError>;
}

/// Wrap a keyword in the fixed cinematic style.
pub fn build_image_prompt(keyword: &str) -> String {
    format!(
        "high-quality, abstract, surrealistic illustration of: {keyword}. \
Style: Cinematic lighting, mystery thriller atmosphere, double exposure, \
psychological horror or dreamscape. Ethereal but slightly gritty. No text."
    )
}

#[derive(Debug, Clone)]
pub struct AiStudioImageClient {
    upstream: UpstreamClient,
}

impl AiStudioImageClient {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl ImageGeneration for AiStudioImageClient {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Option<String>, ImagingError> {
        let body = self.upstream.post_json(GENERATIONS_PATH, request).await?;
        Ok(first_image(&body)?)
    }
}

/// `data[0].b64_json`. An empty or absent `data` list means no image;
/// an entry without a string payload is malformed.
fn first_image(body: &Value) -> Result<Option<String>, UpstreamError> {
    let Some(first) = body
        .get("data")
        .and_then(Value::as_array)
        .and_then(|d| d.first())
    else {
        return Ok(None);
    };

    first
        .get("b64_json")
        .and_then(Value::as_str)
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| UpstreamError::Malformed("missing data[0].b64_json".to_string()))
}

pub struct ImagePipeline {
    client: Arc<dyn ImageGeneration>,
}

impl ImagePipeline {
    pub fn new(client: Arc<dyn ImageGeneration>) -> Self {
        Self { client }
    }

    pub fn generation_request(keyword: &str) -> ImageGenerationRequest {
        ImageGenerationRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: build_image_prompt(keyword),
            response_format: "b64_json".to_string(),
            size: IMAGE_SIZE.to_string(),
            n: 1,
        }
    }

    pub async fn generate(&self, keyword: &str) -> Result<ImageResponse, ImagingError> {
        let request = Self::generation_request(keyword);
        let Some(payload) = self.client.generate(&request).await? else {
            tracing::warn!(keyword, "Image provider returned no images");
            return Err(ImagingError::NoImage);
        };

        let decoded = STANDARD.decode(payload.trim()).map_err(|e| {
            UpstreamError::Malformed(format!("image payload is not valid base64: {e}"))
        })?;
        tracing::info!(keyword, bytes = decoded.len(), "Image generated");

        Ok(ImageResponse {
            image_url: format!("{DATA_URI_PREFIX}{}", payload.trim()),
        })
    }
}

/// In-memory image provider with a fixed outcome.
#[derive(Debug)]
pub struct MockImageClient {
    payload: Result<Option<String>, u16>,
    requests: Mutex<Vec<ImageGenerationRequest>>,
}

impl MockImageClient {
    /// Always returns `payload` as the first image.
    pub fn returning(payload: &str) -> Self {
        Self::with(Ok(Some(payload.to_string())))
    }

    /// Succeeds with an empty image list.
    pub fn empty() -> Self {
        Self::with(Ok(None))
    }

    /// Fails with an upstream status.
    pub fn failing(status: u16) -> Self {
        Self::with(Err(status))
    }

    fn with(payload: Result<Option<String>, u16>) -> Self {
        Self {
            payload,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ImageGenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageGeneration for MockImageClient {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Option<String>, ImagingError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        match &self.payload {
            Ok(p) => Ok(p.clone()),
            Err(status) => Err(UpstreamError::Status {
                status: *status,
                body: "mock failure".to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // "PNG" in base64
    const PAYLOAD: &str = "UE5H";

    #[test]
    fn prompt_wraps_keyword_in_style() {
        let prompt = build_image_prompt("broken compass");
        assert!(prompt.starts_with("high-quality, abstract, surrealistic illustration of: broken compass."));
        assert!(prompt.contains("double exposure"));
        assert!(prompt.ends_with("No text."));
    }

    #[test]
    fn generation_request_uses_fixed_settings() {
        let body = serde_json::to_value(ImagePipeline::generation_request("fog")).unwrap();
        assert_eq!(body["model"], "Stable-Diffusion-XL");
        assert_eq!(body["size"], "1024x1024");
        assert_eq!(body["n"], 1);
        assert_eq!(body["response_format"], "b64_json");
    }

    #[test]
    fn first_image_handles_shapes() {
        assert_eq!(
            first_image(&json!({"data": [{"b64_json": "abc"}]})).unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(first_image(&json!({"data": []})).unwrap(), None);
        assert_eq!(first_image(&json!({})).unwrap(), None);
        assert!(first_image(&json!({"data": [{"url": "x"}]})).is_err());
    }

    #[tokio::test]
    async fn wraps_payload_as_data_uri() {
        let mock = Arc::new(MockImageClient::returning(PAYLOAD));
        let response = ImagePipeline::new(mock.clone())
            .generate("locked door")
            .await
            .unwrap();
        assert_eq!(response.image_url, "data:image/png;base64,UE5H");
        assert!(mock.requests()[0].prompt.contains("locked door"));
    }

    #[tokio::test]
    async fn empty_result_is_no_image() {
        let pipeline = ImagePipeline::new(Arc::new(MockImageClient::empty()));
        let err = pipeline.generate("fog").await.unwrap_err();
        assert!(matches!(err, ImagingError::NoImage));
        assert_eq!(err.to_string(), "No image generated");
    }

    #[tokio::test]
    async fn invalid_base64_is_malformed() {
        let pipeline = ImagePipeline::new(Arc::new(MockImageClient::returning("not base64!")));
        let err = pipeline.generate("fog").await.unwrap_err();
        assert!(matches!(
            err,
            ImagingError::Upstream(UpstreamError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn upstream_status_passes_through() {
        let pipeline = ImagePipeline::new(Arc::new(MockImageClient::failing(500)));
        let err = pipeline.generate("fog").await.unwrap_err();
        assert!(matches!(
            err,
            ImagingError::Upstream(UpstreamError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn client_posts_generation_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATIONS_PATH)
            .match_header("authorization", "Bearer k")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "Stable-Diffusion-XL",
                "n": 1
            })))
            .with_status(200)
            .with_body(format!(r#"{{"data":[{{"b64_json":"{PAYLOAD}"}}]}}"#))
            .create_async()
            .await;

        let client = AiStudioImageClient::new(UpstreamClient::new(&server.url(), "k", 5).unwrap());
        let payload = client
            .generate(&ImagePipeline::generation_request("fog"))
            .await
            .unwrap();
        assert_eq!(payload.as_deref(), Some(PAYLOAD));
        mock.assert_async().await;
    }
}
