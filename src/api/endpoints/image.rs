use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{ImageRequest, ImageResponse};

/// `POST /generate-image` — illustration for a node keyword.
pub async fn generate(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(request) = payload?;
    let response = ctx.imaging.generate(&request.keyword).await?;
    Ok(Json(response))
}
