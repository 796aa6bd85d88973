//! Profile HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/profile - Fetch the caller's profile
//! - PUT /api/v1/profile - Update the full name (email is read-only)
//!
//! Profiles are provisioned by the identity side (see `etutor register`),
//! so a PUT against a missing profile is a 404, not an upsert.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use engitutor_core::profile::repository::ProfileRepository;
use engitutor_types::profile::Profile;

use crate::http::error::AppError;
use crate::http::extractors::owner::OwnerId;
use crate::state::AppState;

/// GET /api/v1/profile - fetch the caller's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .profile_repo
        .get_profile(&owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// Request body for profile updates. Only the full name is writable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
}

/// PUT /api/v1/profile - update the caller's full name.
pub async fn update_profile(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    state
        .profile_repo
        .update_full_name(&owner_id, body.full_name.as_deref())
        .await
        .map_err(|e| match e {
            engitutor_types::error::RepositoryError::NotFound => {
                AppError::NotFound("Profile not found".to_string())
            }
            other => other.into(),
        })?;

    let profile = state
        .profile_repo
        .get_profile(&owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}
