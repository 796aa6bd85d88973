use thiserror::Error;

/// Errors from repository operations (used by trait definitions in engitutor-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the chat relay.
///
/// Display strings double as the client-facing error messages, so the
/// provider variant is deliberately generic: the original provider error
/// text is logged server-side and never leaks to the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Failed to get response from AI")]
    Provider,

    #[error("AI provider timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors from the conversation session controller.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("no conversation is bound; start or bind one first")]
    NotActive,

    #[error("a send is already in flight")]
    Busy,

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_messages_are_generic() {
        // Client-facing text must not carry provider detail.
        assert_eq!(RelayError::EmptyMessage.to_string(), "Message is required");
        assert_eq!(RelayError::Provider.to_string(), "Failed to get response from AI");
    }

    #[test]
    fn test_send_error_wraps_relay_error() {
        let err: SendError = RelayError::Provider.into();
        assert_eq!(err.to_string(), "Failed to get response from AI");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
