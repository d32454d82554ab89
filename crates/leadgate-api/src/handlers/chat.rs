//! Chat proxy handler.

use axum::{extract::State, Json};
use leadgate_core::models::{ChatRequest, ChatResponse};
use leadgate_core::AppError;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

pub async fn chat(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, HttpAppError> {
    if request.messages.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Messages array is required".to_string(),
        )));
    }
    let bot_type = request
        .bot_type
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| {
            HttpAppError(AppError::InvalidInput("Bot type is required".to_string()))
        })?;

    tracing::debug!(
        bot_type,
        messages = request.messages.len(),
        "Chat request received"
    );

    let response = state.chat.complete(&request.messages, bot_type).await?;
    Ok(Json(response))
}
