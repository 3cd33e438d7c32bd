//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::config::{AppConfig, UPSTREAM_TIMEOUT_SECS};
use crate::pipeline::canvas::{AiStudioChatClient, CanvasPipeline};
use crate::pipeline::imaging::{AiStudioImageClient, ImagePipeline};
use crate::pipeline::upstream::{UpstreamClient, UpstreamError};

/// Handed to every handler through `State`. Read-only after startup.
#[derive(Clone)]
pub struct ApiContext {
    pub canvas: Arc<CanvasPipeline>,
    pub imaging: Arc<ImagePipeline>,
    pub allowed_origins: Arc<Vec<String>>,
}

impl ApiContext {
    pub fn new(canvas: CanvasPipeline, imaging: ImagePipeline, allowed_origins: Vec<String>) -> Self {
        Self {
            canvas: Arc::new(canvas),
            imaging: Arc::new(imaging),
            allowed_origins: Arc::new(allowed_origins),
        }
    }

    /// Wire the AI Studio clients from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.base_url, &config.api_key, UPSTREAM_TIMEOUT_SECS)?;

        let canvas = CanvasPipeline::new(
            Arc::new(AiStudioChatClient::new(upstream.clone())),
            config.schema_mode,
        );
        let imaging = ImagePipeline::new(Arc::new(AiStudioImageClient::new(upstream)));

        Ok(Self::new(canvas, imaging, config.allowed_origins.clone()))
    }
}
