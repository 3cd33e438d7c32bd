//! Chat pipeline: conversation state in, validated `ChatResponse` out.
//!
//! context/history formatters → prompt builder → completion client →
//! extractor → validator. Only the completion call suspends; every
//! other stage is a pure transform.

pub mod types;
pub mod context;
pub mod history;
pub mod prompt;
pub mod schema;
pub mod client;
pub mod extract;
pub mod validate;
pub mod orchestrator;

pub use types::*;
pub use context::*;
pub use history::*;
pub use prompt::*;
pub use schema::*;
pub use client::*;
pub use extract::*;
pub use validate::*;
pub use orchestrator::*;

use thiserror::Error;

use crate::pipeline::upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Failed to parse JSON response: {message} (content preview: {preview:?})")]
    JsonParsing { message: String, preview: String },

    #[error("Response validation failed at `{field}`: {reason}")]
    Validation { field: String, reason: String },
}

impl CanvasError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
