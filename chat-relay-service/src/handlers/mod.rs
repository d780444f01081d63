//! HTTP handlers for the relay endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dtos::{ChatRequest, ChatResponse, ImageRequest, ImageResponse};
use crate::error::AppError;
use crate::services::conversation;
use crate::utils::ValidatedJson;
use crate::AppState;

/// Relay a chat completion request upstream.
pub async fn chat(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let turns = conversation::assemble_turns(&request);
    let reply = state.chat_provider.generate(&turns).await?;
    Ok((StatusCode::OK, Json(ChatResponse { reply })))
}

/// Relay an image generation request upstream.
pub async fn generate_image(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let url = state
        .image_provider
        .generate(&request.prompt, &request.size)
        .await?;
    Ok((StatusCode::OK, Json(ImageResponse { url })))
}

/// Fallback for unsupported methods on the relay routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
