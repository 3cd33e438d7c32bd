//! Route handlers. Thin: decode, delegate to a pipeline, map errors.

pub mod chat;
pub mod health;
pub mod image;

use axum::extract::rejection::JsonRejection;

use crate::api::error::ApiError;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}
