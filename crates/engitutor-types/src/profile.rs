//! User profile type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile, one-to-one with an authenticated identity.
///
/// The id equals the owner id used for conversation filtering. Email is
/// read-only from the client side; only `full_name` is updatable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: String,
}
