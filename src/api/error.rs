//! HTTP error envelope: `{"detail": "..."}` with a mapped status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::canvas::CanvasError;
use crate::pipeline::imaging::ImagingError;
use crate::pipeline::upstream::UpstreamError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Provider answered with a non-success status; passed through as-is.
    #[error("{detail}")]
    Upstream { status: u16, detail: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => tracing::error!(detail, "Request failed"),
            ApiError::Upstream { status, detail } => {
                tracing::warn!(status, detail, "Upstream status passed through")
            }
            _ => {}
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        let detail = err.to_string();
        match err {
            UpstreamError::Status { status, .. } => ApiError::Upstream { status, detail },
            _ => ApiError::Internal(detail),
        }
    }
}

impl From<CanvasError> for ApiError {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::Upstream(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ImagingError> for ApiError {
    fn from(err: ImagingError) -> Self {
        match err {
            ImagingError::Upstream(e) => e.into(),
            no_image @ ImagingError::NoImage => ApiError::NotFound(no_image.to_string()),
        }
    }
}
