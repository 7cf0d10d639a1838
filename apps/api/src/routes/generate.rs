//! Prompt-forwarding endpoint: passes a prompt through to the chat model.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub result: String,
}

/// POST /api/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let api_key = state.api_key(&headers)?;
    info!(prompt_chars = request.prompt.chars().count(), "Forwarding prompt");

    let result = state.reviewer.complete(&api_key, &request.prompt).await?;
    Ok(Json(GenerateResponse { result }))
}
