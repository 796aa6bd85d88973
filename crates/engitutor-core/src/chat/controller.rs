//! Conversation session controller.
//!
//! Orchestrates one conversation: binds an existing conversation (loading
//! its transcript) or creates a fresh one, then drives each exchange --
//! persist the user message, invoke the relay, persist the assistant
//! reply, and set the conversation title after the first exchange.
//!
//! Persistence failures do not abort an exchange and do not roll back the
//! in-memory transcript; they are logged and reported through the returned
//! [`SendOutcome`] so the caller can reconcile transcript and store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use engitutor_types::chat::{title_from_message, ChatMessage, Conversation, MessageRole};
use engitutor_types::error::{RepositoryError, SendError};

use crate::chat::repository::ConversationRepository;
use crate::llm::provider::LlmProvider;
use crate::relay::Relay;

/// Default title given to a conversation before its first exchange.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No conversation bound.
    Uninitialized,
    /// Fetching an existing conversation's messages.
    Loading,
    /// Conversation bound, ready to send and receive.
    Active,
}

/// Outcome of one store write during an exchange.
#[derive(Debug)]
pub enum PersistOutcome {
    Saved,
    Failed(RepositoryError),
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved)
    }
}

/// Result of a completed exchange.
#[derive(Debug)]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
    pub user_persisted: PersistOutcome,
    pub assistant_persisted: PersistOutcome,
    /// True when this exchange was the conversation's first and the title
    /// was updated from the user message.
    pub title_updated: bool,
}

/// Client-side orchestration for one conversation.
///
/// Generic over the repository and provider traits so tests can substitute
/// in-memory doubles. One controller serves one owner and at most one
/// conversation at a time; `send` takes `&mut self`, so a single instance
/// can never have two exchanges in flight.
pub struct SessionController<C: ConversationRepository, P: LlmProvider> {
    repo: Arc<C>,
    relay: Arc<Relay<P>>,
    owner_id: Uuid,
    conversation: Option<Conversation>,
    transcript: Vec<ChatMessage>,
    state: SessionState,
    busy: bool,
}

impl<C: ConversationRepository, P: LlmProvider> SessionController<C, P> {
    pub fn new(repo: Arc<C>, relay: Arc<Relay<P>>, owner_id: Uuid) -> Self {
        Self {
            repo,
            relay,
            owner_id,
            conversation: None,
            transcript: Vec::new(),
            state: SessionState::Uninitialized,
            busy: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Bind an existing conversation and load its messages (ascending).
    pub async fn bind(&mut self, conversation_id: Uuid) -> Result<(), RepositoryError> {
        self.state = SessionState::Loading;

        let conversation = match self
            .repo
            .get_conversation(&conversation_id, &self.owner_id)
            .await
        {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                self.state = SessionState::Uninitialized;
                return Err(RepositoryError::NotFound);
            }
            Err(e) => {
                self.state = SessionState::Uninitialized;
                return Err(e);
            }
        };

        let messages = match self.repo.get_messages(&conversation_id, &self.owner_id).await {
            Ok(messages) => messages,
            Err(e) => {
                self.state = SessionState::Uninitialized;
                return Err(e);
            }
        };

        info!(conversation_id = %conversation_id, messages = messages.len(), "Conversation loaded");
        self.conversation = Some(conversation);
        self.transcript = messages;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Create a new conversation with the default title and bind it.
    pub async fn start(&mut self) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::now_v7(),
            owner_id: self.owner_id,
            title: DEFAULT_TITLE.to_string(),
            created_at: now,
            updated_at: now,
        };

        let conversation = self.repo.create_conversation(&conversation).await?;
        info!(conversation_id = %conversation.id, "Conversation created");

        self.conversation = Some(conversation);
        self.transcript = Vec::new();
        self.state = SessionState::Active;
        Ok(())
    }

    /// Bind the addressed conversation, or create one when none is given.
    ///
    /// Mirrors first-load behavior: an explicit identifier loads that
    /// conversation; otherwise a new one is created lazily unless a
    /// conversation is already bound.
    pub async fn ensure(&mut self, conversation_id: Option<Uuid>) -> Result<(), RepositoryError> {
        match conversation_id {
            Some(id) => self.bind(id).await,
            None if self.state == SessionState::Active => Ok(()),
            None => self.start().await,
        }
    }

    /// Run one exchange: persist the user message, invoke the relay,
    /// persist the assistant reply, and set the title on a first exchange.
    ///
    /// Empty (trimmed) input is a silent no-op and returns `Ok(None)`.
    /// A relay failure leaves the transcript showing only the user turn
    /// for this exchange; no retry is attempted. The busy flag clears on
    /// every path.
    pub async fn send(&mut self, input: &str) -> Result<Option<SendOutcome>, SendError> {
        let text = input.trim().to_string();
        if text.is_empty() {
            return Ok(None);
        }
        if self.busy {
            return Err(SendError::Busy);
        }
        let conversation_id = match (self.state, &self.conversation) {
            (SessionState::Active, Some(conversation)) => conversation.id,
            _ => return Err(SendError::NotActive),
        };

        self.busy = true;
        let result = self.exchange(conversation_id, &text).await;
        self.busy = false;
        result.map(Some)
    }

    async fn exchange(
        &mut self,
        conversation_id: Uuid,
        text: &str,
    ) -> Result<SendOutcome, SendError> {
        let first_exchange = self.transcript.is_empty();

        let user_message = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id,
            owner_id: self.owner_id,
            role: MessageRole::User,
            content: text.to_string(),
            created_at: Utc::now(),
        };
        self.transcript.push(user_message.clone());
        let user_persisted = self.persist(&user_message).await;

        let reply = self.relay.answer(text).await?;

        let assistant_message = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id,
            owner_id: self.owner_id,
            role: MessageRole::Assistant,
            content: reply,
            created_at: Utc::now(),
        };
        self.transcript.push(assistant_message.clone());
        let assistant_persisted = self.persist(&assistant_message).await;

        let mut title_updated = false;
        if first_exchange {
            let title = title_from_message(&user_message.content);
            match self
                .repo
                .update_title(&conversation_id, &self.owner_id, &title)
                .await
            {
                Ok(()) => {
                    if let Some(conversation) = &mut self.conversation {
                        conversation.title = title;
                        conversation.updated_at = Utc::now();
                    }
                    title_updated = true;
                }
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Failed to update conversation title");
                }
            }
        }

        Ok(SendOutcome {
            user_message,
            assistant_message,
            user_persisted,
            assistant_persisted,
            title_updated,
        })
    }

    async fn persist(&self, message: &ChatMessage) -> PersistOutcome {
        match self.repo.save_message(message).await {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to save message");
                PersistOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use engitutor_types::error::RelayError;
    use engitutor_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    use crate::relay::RelayConfig;

    #[derive(Default)]
    struct MemoryStore {
        conversations: Vec<Conversation>,
        messages: Vec<ChatMessage>,
    }

    /// In-memory repository double. `fail_saves` simulates a store that
    /// rejects message writes while conversations still work.
    #[derive(Default)]
    struct MemoryRepo {
        store: Mutex<MemoryStore>,
        fail_saves: bool,
    }

    impl MemoryRepo {
        fn failing_saves() -> Self {
            Self {
                store: Mutex::new(MemoryStore::default()),
                fail_saves: true,
            }
        }

        fn conversations(&self) -> Vec<Conversation> {
            self.store.lock().unwrap().conversations.clone()
        }

        fn messages(&self) -> Vec<ChatMessage> {
            self.store.lock().unwrap().messages.clone()
        }
    }

    impl ConversationRepository for MemoryRepo {
        async fn create_conversation(
            &self,
            conversation: &Conversation,
        ) -> Result<Conversation, RepositoryError> {
            let mut store = self.store.lock().unwrap();
            store.conversations.push(conversation.clone());
            Ok(conversation.clone())
        }

        async fn get_conversation(
            &self,
            conversation_id: &Uuid,
            owner_id: &Uuid,
        ) -> Result<Option<Conversation>, RepositoryError> {
            let store = self.store.lock().unwrap();
            Ok(store
                .conversations
                .iter()
                .find(|c| c.id == *conversation_id && c.owner_id == *owner_id)
                .cloned())
        }

        async fn list_conversations(
            &self,
            owner_id: &Uuid,
        ) -> Result<Vec<Conversation>, RepositoryError> {
            let store = self.store.lock().unwrap();
            let mut conversations: Vec<Conversation> = store
                .conversations
                .iter()
                .filter(|c| c.owner_id == *owner_id)
                .cloned()
                .collect();
            conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(conversations)
        }

        async fn update_title(
            &self,
            conversation_id: &Uuid,
            owner_id: &Uuid,
            title: &str,
        ) -> Result<(), RepositoryError> {
            let mut store = self.store.lock().unwrap();
            let conversation = store
                .conversations
                .iter_mut()
                .find(|c| c.id == *conversation_id && c.owner_id == *owner_id)
                .ok_or(RepositoryError::NotFound)?;
            conversation.title = title.to_string();
            conversation.updated_at = Utc::now();
            Ok(())
        }

        async fn delete_conversation(
            &self,
            conversation_id: &Uuid,
            owner_id: &Uuid,
        ) -> Result<(), RepositoryError> {
            let mut store = self.store.lock().unwrap();
            store
                .conversations
                .retain(|c| !(c.id == *conversation_id && c.owner_id == *owner_id));
            store.messages.retain(|m| m.conversation_id != *conversation_id);
            Ok(())
        }

        async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
            if self.fail_saves {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let mut store = self.store.lock().unwrap();
            store.messages.push(message.clone());
            Ok(())
        }

        async fn get_messages(
            &self,
            conversation_id: &Uuid,
            owner_id: &Uuid,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let store = self.store.lock().unwrap();
            let mut messages: Vec<ChatMessage> = store
                .messages
                .iter()
                .filter(|m| m.conversation_id == *conversation_id && m.owner_id == *owner_id)
                .cloned()
                .collect();
            messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(messages)
        }
    }

    struct StubProvider {
        reply: Result<String, ()>,
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    id: "cmpl-test".to_string(),
                    content: content.clone(),
                    model: request.model.clone(),
                }),
                Err(()) => Err(LlmError::Provider {
                    message: "upstream 500".to_string(),
                }),
            }
        }
    }

    fn relay(reply: Result<&str, ()>) -> Arc<Relay<StubProvider>> {
        let provider = StubProvider {
            reply: reply.map(str::to_string),
        };
        Arc::new(Relay::new(
            provider,
            RelayConfig::new("gpt-5-mini-2025-08-07").with_timeout(Duration::from_secs(5)),
        ))
    }

    fn controller(
        repo: Arc<MemoryRepo>,
        reply: Result<&str, ()>,
    ) -> SessionController<MemoryRepo, StubProvider> {
        SessionController::new(repo, relay(reply), Uuid::now_v7())
    }

    #[tokio::test]
    async fn first_send_persists_pair_and_sets_title() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(
            Arc::clone(&repo),
            Ok("A binary search tree keeps keys in sorted order."),
        );

        controller.start().await.unwrap();
        assert_eq!(controller.state(), SessionState::Active);
        assert_eq!(controller.conversation().unwrap().title, DEFAULT_TITLE);

        let outcome = controller
            .send("What is a binary search tree?")
            .await
            .unwrap()
            .expect("non-empty input must produce an outcome");

        assert!(outcome.title_updated);
        assert!(outcome.user_persisted.is_saved());
        assert!(outcome.assistant_persisted.is_saved());

        // One conversation, titled from the first user message.
        let conversations = repo.conversations();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].title, "What is a binary search tree?");

        // Two messages persisted, user then assistant.
        let messages = repo.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "What is a binary search tree?");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(!messages[1].content.is_empty());

        // Transcript matches.
        assert_eq!(controller.transcript().len(), 2);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn second_send_does_not_alter_title() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(Arc::clone(&repo), Ok("reply"));

        controller.start().await.unwrap();
        controller.send("What is a binary search tree?").await.unwrap();
        let outcome = controller
            .send("And how do I balance one?")
            .await
            .unwrap()
            .unwrap();

        assert!(!outcome.title_updated);
        assert_eq!(
            repo.conversations()[0].title,
            "What is a binary search tree?"
        );
        assert_eq!(repo.messages().len(), 4);
    }

    #[tokio::test]
    async fn title_truncates_long_first_message() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(Arc::clone(&repo), Ok("reply"));

        controller.start().await.unwrap();
        let long = "Explain the difference between a red-black tree and an AVL tree in detail";
        controller.send(long).await.unwrap();

        let title = repo.conversations()[0].title.clone();
        assert_eq!(title.chars().count(), 50);
        assert!(long.starts_with(&title));
    }

    #[tokio::test]
    async fn relay_failure_leaves_only_the_user_turn() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(Arc::clone(&repo), Err(()));

        controller.start().await.unwrap();
        let err = controller.send("hello").await.unwrap_err();

        assert!(matches!(err, SendError::Relay(RelayError::Provider)));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].role, MessageRole::User);
        // The user message was still persisted before the relay call.
        assert_eq!(repo.messages().len(), 1);
        // Busy cleared despite the failure.
        assert!(!controller.is_busy());
        // The title was never updated.
        assert_eq!(repo.conversations()[0].title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn empty_input_is_a_silent_noop() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(Arc::clone(&repo), Ok("reply"));

        controller.start().await.unwrap();
        let outcome = controller.send("   \n ").await.unwrap();

        assert!(outcome.is_none());
        assert!(controller.transcript().is_empty());
        assert!(repo.messages().is_empty());
    }

    #[tokio::test]
    async fn send_without_a_bound_conversation_errors() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(repo, Ok("reply"));

        let err = controller.send("hello").await.unwrap_err();
        assert!(matches!(err, SendError::NotActive));
    }

    #[tokio::test]
    async fn bind_loads_existing_messages_ascending() {
        let repo = Arc::new(MemoryRepo::default());
        let owner_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let now = Utc::now();

        {
            let mut store = repo.store.lock().unwrap();
            store.conversations.push(Conversation {
                id: conversation_id,
                owner_id,
                title: "Earlier chat".to_string(),
                created_at: now,
                updated_at: now,
            });
            store.messages.push(ChatMessage {
                id: Uuid::now_v7(),
                conversation_id,
                owner_id,
                role: MessageRole::User,
                content: "first".to_string(),
                created_at: now,
            });
            store.messages.push(ChatMessage {
                id: Uuid::now_v7(),
                conversation_id,
                owner_id,
                role: MessageRole::Assistant,
                content: "second".to_string(),
                created_at: now + chrono::Duration::seconds(1),
            });
        }

        let mut controller =
            SessionController::new(Arc::clone(&repo), relay(Ok("reply")), owner_id);
        controller.bind(conversation_id).await.unwrap();

        assert_eq!(controller.state(), SessionState::Active);
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.transcript()[0].content, "first");
        assert_eq!(controller.transcript()[1].content, "second");
    }

    #[tokio::test]
    async fn bind_rejects_foreign_conversation() {
        let repo = Arc::new(MemoryRepo::default());
        let other_owner = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let now = Utc::now();
        repo.store.lock().unwrap().conversations.push(Conversation {
            id: conversation_id,
            owner_id: other_owner,
            title: "not yours".to_string(),
            created_at: now,
            updated_at: now,
        });

        let mut controller = controller(repo, Ok("reply"));
        let err = controller.bind(conversation_id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(controller.state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn ensure_without_id_reuses_bound_conversation() {
        let repo = Arc::new(MemoryRepo::default());
        let mut controller = controller(Arc::clone(&repo), Ok("reply"));

        controller.ensure(None).await.unwrap();
        let first = controller.conversation().unwrap().id;
        controller.ensure(None).await.unwrap();
        assert_eq!(controller.conversation().unwrap().id, first);
        assert_eq!(repo.conversations().len(), 1);
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_not_fatal() {
        let repo = Arc::new(MemoryRepo::failing_saves());
        let mut controller = controller(Arc::clone(&repo), Ok("reply"));

        controller.start().await.unwrap();
        let outcome = controller.send("hello").await.unwrap().unwrap();

        // The exchange completed; the divergence is reported, not hidden.
        assert!(!outcome.user_persisted.is_saved());
        assert!(!outcome.assistant_persisted.is_saved());
        assert_eq!(controller.transcript().len(), 2);
    }
}
