//! Owner identity extractor.
//!
//! Authentication itself is an external collaborator (the original system
//! delegated it to a managed identity provider). Requests carry the
//! already-authenticated owner id in the `x-user-id` header as a UUID;
//! every store query filters by it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated owner of the request.
#[derive(Debug, Clone, Copy)]
pub struct OwnerId(pub Uuid);

impl FromRequestParts<AppState> for OwnerId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get("x-user-id").ok_or_else(|| {
            AppError::Unauthorized("Missing x-user-id header".to_string())
        })?;

        let value = header.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid x-user-id header encoding".to_string())
        })?;

        let owner_id = value.trim().parse::<Uuid>().map_err(|_| {
            AppError::Unauthorized(format!("Invalid user id: {value}"))
        })?;

        Ok(OwnerId(owner_id))
    }
}
