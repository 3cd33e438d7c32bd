use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{ChatRequest, ChatResponse};

/// `POST /chat` — one conversational turn.
pub async fn turn(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let response = ctx.canvas.process(&request).await?;
    Ok(Json(response))
}
