//! Conversation and message types for Engitutor.
//!
//! A conversation is a titled, owned thread of ordered messages. Messages
//! are append-only: they are created in user/assistant pairs per exchange
//! and never mutated or reordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Number of characters of the first user message used as the
/// auto-generated conversation title.
pub const TITLE_MAX_CHARS: usize = 50;

/// A tutoring conversation owned by a single user.
///
/// The title starts as a default ("New Chat") and is overwritten with a
/// prefix of the first user message after the first exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a conversation.
///
/// Ordered by `created_at` within a conversation; `owner_id` duplicates the
/// conversation's owner so message queries can filter on it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub owner_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Derive a conversation title from the first user message.
///
/// Takes the first [`TITLE_MAX_CHARS`] characters (not bytes, so multibyte
/// input cannot split a character).
pub fn title_from_message(message: &str) -> String {
    message.chars().take(TITLE_MAX_CHARS).collect()
}
