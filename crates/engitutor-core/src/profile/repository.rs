//! ProfileRepository trait definition.
//!
//! Profiles are keyed by owner id. Email is read-only from the client's
//! perspective, so the only mutation besides provisioning is the full name.

use engitutor_types::error::RepositoryError;
use engitutor_types::profile::Profile;
use uuid::Uuid;

pub trait ProfileRepository: Send + Sync {
    /// Get a profile by owner id.
    fn get_profile(
        &self,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Insert or replace a profile (account provisioning).
    fn upsert_profile(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Update only the full name; email is never touched.
    fn update_full_name(
        &self,
        owner_id: &Uuid,
        full_name: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
