//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: permissive CORS (any
//! origin, fixed header allow-list -- the CORS layer answers preflight
//! OPTIONS before handlers run) and request tracing.

use axum::http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Any origin may call; the header allow-list is fixed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-user-id"),
        ]);

    let api_routes = Router::new()
        // The relay
        .route("/chat", post(handlers::chat::relay_chat))
        // Conversations
        .route(
            "/conversations",
            post(handlers::conversation::create_conversation)
                .get(handlers::conversation::list_conversations),
        )
        .route(
            "/conversations/{id}",
            delete(handlers::conversation::delete_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(handlers::conversation::get_messages)
                .post(handlers::conversation::send_message),
        )
        // Profile
        .route(
            "/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use engitutor_core::relay::{Relay, RelayConfig};
    use engitutor_infra::llm::openai::OpenAiProvider;
    use engitutor_infra::sqlite::conversation::SqliteConversationRepository;
    use engitutor_infra::sqlite::pool::DatabasePool;
    use engitutor_infra::sqlite::profile::SqliteProfileRepository;

    use super::build_router;
    use crate::state::AppState;

    /// State against a throwaway database. The provider holds a dummy key;
    /// requests in these tests fail validation before any provider call.
    async fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let db_pool = DatabasePool::new(&url).await.unwrap();
        let conversation_repo = Arc::new(SqliteConversationRepository::new(db_pool.clone()));
        let profile_repo = Arc::new(SqliteProfileRepository::new(db_pool.clone()));
        let provider = OpenAiProvider::new(&SecretString::from("sk-test"), "gpt-5-mini-2025-08-07");
        let relay = Arc::new(Relay::new(
            provider,
            RelayConfig::new("gpt-5-mini-2025-08-07"),
        ));

        (
            dir,
            AppState {
                db_pool,
                conversation_repo,
                profile_repo,
                relay,
            },
        )
    }

    async fn post_chat(body: &str) -> (StatusCode, serde_json::Value) {
        let (_dir, state) = test_state().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_chat_body_is_a_500_with_error_shape() {
        let (status, body) = post_chat("{not json").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .expect("body must be the { \"error\": ... } shape");
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn blank_chat_message_is_a_400_message_required() {
        let (status, body) = post_chat(r#"{"message": "   "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required");
    }

    #[tokio::test]
    async fn missing_chat_message_field_is_a_400() {
        let (status, body) = post_chat(r#"{"conversationId": "abc"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required");
    }

    #[tokio::test]
    async fn conversations_without_owner_header_is_a_401() {
        let (_dir, state) = test_state().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("error").is_some());
    }
}
