//! The chat relay: forwards one user message to the completion provider.
//!
//! The relay is stateless and non-contextual. Every call builds a fixed
//! two-turn prompt -- the tutoring persona as the system instruction, the
//! user's message as the sole user turn -- so prior conversation history is
//! never forwarded to the provider. It performs no persistence.

use std::time::Duration;

use tracing::{error, info, warn};

use engitutor_types::error::RelayError;
use engitutor_types::llm::{CompletionRequest, Message, MessageRole};

use crate::llm::provider::LlmProvider;

/// Fixed system instruction describing the tutoring persona.
pub const TUTOR_SYSTEM_PROMPT: &str = r#"You are EngiBot AI, an expert AI tutor specialized in helping engineering students. You have deep knowledge in:

1. Full Stack Development (MERN Stack): MongoDB, Express.js, React, Node.js, JavaScript, TypeScript
2. Machine Learning & Deep Learning: Algorithms, Neural Networks, TensorFlow, PyTorch, Scikit-learn
3. Data Science: Python, Pandas, NumPy, Data Analysis, Statistical Methods
4. Data Structures & Algorithms: Arrays, Trees, Graphs, Sorting, Searching, Dynamic Programming
5. Operating Systems: Process Management, Memory Management, File Systems, Concurrency
6. Database Management (DBMS): SQL, Normalization, Transactions, Indexing
7. Computer Networks: TCP/IP, HTTP, Network Protocols, Security
8. Compiler Design: Lexical Analysis, Parsing, Code Generation

Your teaching style:
- Provide clear, step-by-step explanations
- Include practical code examples when relevant
- Explain concepts from fundamentals to advanced
- Use analogies to make complex topics easier to understand
- Encourage best practices and industry standards
- Be patient and supportive

Always structure your responses to be educational, accurate, and helpful for university-level engineering students."#;

/// Bounded output length for generated replies.
pub const MAX_COMPLETION_TOKENS: u32 = 2000;

/// Default bound on the outbound provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the relay's provider calls.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Output-length cap for generated replies.
    pub max_tokens: u32,
    /// Upper bound on the outbound provider call.
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: MAX_COMPLETION_TOKENS,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stateless handler that proxies a chat message to the completion provider.
pub struct Relay<P: LlmProvider> {
    provider: P,
    config: RelayConfig,
}

impl<P: LlmProvider> Relay<P> {
    pub fn new(provider: P, config: RelayConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Forward a user message to the provider and return the generated text.
    ///
    /// Rejects empty or whitespace-only messages without calling the
    /// provider. Provider failures are logged with their full detail here
    /// and surfaced as the generic [`RelayError::Provider`]; raw provider
    /// error text never reaches the caller.
    pub async fn answer(&self, message: &str) -> Result<String, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: message.to_string(),
            }],
            system: Some(TUTOR_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: None,
        };

        info!(provider = self.provider.name(), model = %self.config.model, "Sending request to provider");

        let response = match tokio::time::timeout(
            self.config.timeout,
            self.provider.complete(&request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider = self.provider.name(), error = %e, "Provider call failed");
                return Err(RelayError::Provider);
            }
            Err(_) => {
                let secs = self.config.timeout.as_secs();
                warn!(provider = self.provider.name(), timeout_secs = secs, "Provider call timed out");
                return Err(RelayError::Timeout(secs));
            }
        };

        info!(provider = self.provider.name(), "Provider response received");
        Ok(response.content)
    }
}
