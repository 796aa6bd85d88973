//! ConversationRepository trait definition.
//!
//! CRUD operations for conversations and their messages. Every operation
//! takes the owner id and filters on it: callers can only see and mutate
//! rows they own. Uses native async fn in traits (RPITIT, Rust 2024
//! edition); implementations live in engitutor-infra
//! (e.g., `SqliteConversationRepository`).

use engitutor_types::chat::{ChatMessage, Conversation};
use engitutor_types::error::RepositoryError;
use uuid::Uuid;

pub trait ConversationRepository: Send + Sync {
    /// Create a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id, scoped to its owner.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List an owner's conversations, ordered by updated_at DESC.
    fn list_conversations(
        &self,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Update a conversation's title and touch its updated_at timestamp.
    fn update_title(
        &self,
        conversation_id: &Uuid,
        owner_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a conversation. Its messages are removed by the store
    /// (ON DELETE CASCADE), not by application logic.
    fn delete_conversation(
        &self,
        conversation_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to a conversation.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a conversation's messages, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
