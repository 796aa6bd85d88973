//! Application state wiring all services together.
//!
//! AppState holds the concrete repository, relay, and pool instances used
//! by both CLI and REST API. Core types are generic over repository and
//! provider traits; AppState pins them to the infra implementations.

use std::sync::Arc;

use uuid::Uuid;

use engitutor_core::chat::controller::SessionController;
use engitutor_core::relay::{Relay, RelayConfig};
use engitutor_infra::config::AppConfig;
use engitutor_infra::llm::openai::OpenAiProvider;
use engitutor_infra::sqlite::conversation::SqliteConversationRepository;
use engitutor_infra::sqlite::pool::DatabasePool;
use engitutor_infra::sqlite::profile::SqliteProfileRepository;

/// Concrete type alias for the controller generics pinned to infra implementations.
pub type ConcreteController = SessionController<SqliteConversationRepository, OpenAiProvider>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabasePool,
    pub conversation_repo: Arc<SqliteConversationRepository>,
    pub profile_repo: Arc<SqliteProfileRepository>,
    pub relay: Arc<Relay<OpenAiProvider>>,
}

impl AppState {
    /// Initialize state from the environment: open the database (running
    /// migrations) and build the relay against the configured provider.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        // The database lives under the data dir; make sure it exists
        // before SQLite tries to create the file.
        let data_dir = engitutor_infra::sqlite::pool::resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&config.database_url).await?;
        let conversation_repo = Arc::new(SqliteConversationRepository::new(db_pool.clone()));
        let profile_repo = Arc::new(SqliteProfileRepository::new(db_pool.clone()));

        let provider = OpenAiProvider::new(&config.api_key, config.model.clone());
        let relay_config =
            RelayConfig::new(config.model.clone()).with_timeout(config.provider_timeout);
        let relay = Arc::new(Relay::new(provider, relay_config));

        Ok(Self {
            db_pool,
            conversation_repo,
            profile_repo,
            relay,
        })
    }

    /// Build a session controller for one owner.
    ///
    /// Controllers are cheap: per HTTP request or per CLI chat session.
    pub fn controller(&self, owner_id: Uuid) -> ConcreteController {
        SessionController::new(
            Arc::clone(&self.conversation_repo),
            Arc::clone(&self.relay),
            owner_id,
        )
    }
}
