//! LlmProvider trait definition.
//!
//! The abstraction the relay calls through. Uses native async fn in traits
//! (RPITIT, Rust 2024 edition). Implementations live in engitutor-infra
//! (e.g., `OpenAiProvider`).

use engitutor_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends.
///
/// Responses are delivered whole; there is no streaming surface.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
