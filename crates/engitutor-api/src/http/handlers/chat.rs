//! Chat relay endpoint.
//!
//! POST /api/v1/chat
//!
//! The stateless relay: accepts one user message, forwards it to the
//! completion provider with the fixed tutoring persona, and returns the
//! generated text. It performs no persistence and ignores the supplied
//! conversation id when generating the reply.
//!
//! Wire contract:
//! - 200 `{ "response": "<text>" }`
//! - 400 `{ "error": "Message is required" }` for a missing/empty message
//! - 500 `{ "error": "<generic>" }` on provider failure; a malformed body
//!   also yields 500 carrying the deserialization error's message.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the relay endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user message to forward to the provider.
    #[serde(default)]
    pub message: Option<String>,
    /// Accepted for forward compatibility; not used to generate the reply.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response body for the relay endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /api/v1/chat -- forward one message to the completion provider.
pub async fn relay_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // A body that fails to parse is the handler-exception path: 500
    // carrying the error's message, not a 4xx.
    let Json(body) = payload.map_err(|rejection| AppError::Internal(rejection.body_text()))?;

    let message = body.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let response = state.relay.answer(&message).await?;
    Ok(Json(ChatResponse { response }))
}
