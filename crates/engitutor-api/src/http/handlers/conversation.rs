//! Conversation CRUD and send HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/conversations               - Create a conversation
//! - GET    /api/v1/conversations               - List the owner's conversations
//! - GET    /api/v1/conversations/{id}/messages - Messages, oldest first
//! - POST   /api/v1/conversations/{id}/messages - Run one exchange
//! - DELETE /api/v1/conversations/{id}          - Delete (messages cascade)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use engitutor_core::chat::controller::{PersistOutcome, SendOutcome};
use engitutor_core::chat::repository::ConversationRepository;
use engitutor_types::chat::{ChatMessage, Conversation};

use crate::http::error::AppError;
use crate::http::extractors::owner::OwnerId;
use crate::state::AppState;

/// POST /api/v1/conversations - create a conversation with the default title.
pub async fn create_conversation(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let mut controller = state.controller(owner_id);
    controller.start().await?;

    // start() always leaves a bound conversation behind.
    let conversation = controller
        .conversation()
        .cloned()
        .ok_or_else(|| AppError::Internal("controller bound no conversation".to_string()))?;

    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /api/v1/conversations - list conversations, most recently updated first.
pub async fn list_conversations(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state.conversation_repo.list_conversations(&owner_id).await?;
    Ok(Json(conversations))
}

/// GET /api/v1/conversations/{id}/messages - messages ordered by creation time.
pub async fn get_messages(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    // Ownership check first so a foreign conversation reads as absent.
    state
        .conversation_repo
        .get_conversation(&conversation_id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))?;

    let messages = state
        .conversation_repo
        .get_messages(&conversation_id, &owner_id)
        .await?;
    Ok(Json(messages))
}

/// Request body for sending a message within a conversation.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

/// POST /api/v1/conversations/{id}/messages - run one full exchange.
///
/// Binds the conversation, persists the user message, invokes the relay,
/// persists the assistant reply, and updates the title on a first
/// exchange. Persistence failures are reported in the body, not hidden.
pub async fn send_message(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(conversation_id): Path<Uuid>,
    Json(body): Json<SendRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let mut controller = state.controller(owner_id);
    controller.bind(conversation_id).await?;

    let outcome = controller
        .send(&body.message)
        .await?
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;

    Ok(Json(outcome_json(&outcome)))
}

fn outcome_json(outcome: &SendOutcome) -> serde_json::Value {
    json!({
        "userMessage": outcome.user_message,
        "assistantMessage": outcome.assistant_message,
        "userPersisted": persisted(&outcome.user_persisted),
        "assistantPersisted": persisted(&outcome.assistant_persisted),
        "titleUpdated": outcome.title_updated,
    })
}

fn persisted(outcome: &PersistOutcome) -> bool {
    outcome.is_saved()
}

/// DELETE /api/v1/conversations/{id} - delete a conversation.
///
/// Message rows go with it via the store's cascade, not application code.
pub async fn delete_conversation(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(conversation_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .conversation_repo
        .delete_conversation(&conversation_id, &owner_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
