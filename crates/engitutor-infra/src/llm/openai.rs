//! OpenAI completion provider implementation.
//!
//! Uses [`async_openai`] for type-safe request/response handling against
//! the chat completions endpoint. Non-streaming only: the relay delivers
//! responses whole.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use secrecy::{ExposeSecret, SecretString};

use engitutor_core::llm::provider::LlmProvider;
use engitutor_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

/// Provider backed by the OpenAI chat completions API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider against `https://api.openai.com/v1`.
    ///
    /// The key is not validated here; a missing or wrong key surfaces as an
    /// authentication failure on the first completion call.
    pub fn new(api_key: &SecretString, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for msg in &request.messages {
            // The relay only ever sends a single user turn, but map all
            // roles the request type allows.
            let content = msg.content.clone();
            let oai_msg = match msg.role {
                MessageRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(content),
                        name: None,
                    },
                ),
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(content),
                        name: None,
                    })
                }
                MessageRole::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(content)),
                        ..Default::default()
                    },
                ),
            };
            messages.push(oai_msg);
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
        })
    }
}

/// Map async-openai errors onto the domain error type.
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(e, _) => LlmError::Deserialization(e.to_string()),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use engitutor_types::llm::Message;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(&SecretString::from("sk-test"), "gpt-5-mini-2025-08-07")
    }

    #[test]
    fn build_request_prepends_system_instruction() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "What is a mutex?".to_string(),
            }],
            system: Some("You are a tutor.".to_string()),
            max_tokens: 2000,
            temperature: None,
        };

        let oai = provider().build_request(&request);
        assert_eq!(oai.messages.len(), 2);
        assert!(matches!(
            oai.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            oai.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert_eq!(oai.max_completion_tokens, Some(2000));
        // Empty request model falls back to the provider default.
        assert_eq!(oai.model, "gpt-5-mini-2025-08-07");
    }

    #[test]
    fn build_request_keeps_roles_distinct() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![
                Message {
                    role: MessageRole::User,
                    content: "What is a mutex?".to_string(),
                },
                Message {
                    role: MessageRole::Assistant,
                    content: "A lock around shared state.".to_string(),
                },
            ],
            system: None,
            max_tokens: 2000,
            temperature: None,
        };

        let oai = provider().build_request(&request);
        assert!(matches!(
            oai.messages[0],
            ChatCompletionRequestMessage::User(_)
        ));
        assert!(matches!(
            oai.messages[1],
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }

    #[test]
    fn map_api_authentication_error() {
        let err = async_openai::error::OpenAIError::ApiError(async_openai::error::ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: None,
        });
        assert!(matches!(map_openai_error(err), LlmError::AuthenticationFailed));
    }

    #[test]
    fn map_api_rate_limit_error() {
        let err = async_openai::error::OpenAIError::ApiError(async_openai::error::ApiError {
            message: "slow down".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        });
        assert!(matches!(map_openai_error(err), LlmError::RateLimited));
    }

    #[test]
    fn map_unknown_api_error_keeps_detail_for_logging() {
        let err = async_openai::error::OpenAIError::ApiError(async_openai::error::ApiError {
            message: "the model is overloaded".to_string(),
            r#type: Some("server_error".to_string()),
            param: None,
            code: None,
        });
        match map_openai_error(err) {
            LlmError::Provider { message } => assert!(message.contains("overloaded")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
