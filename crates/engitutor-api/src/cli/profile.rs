//! Profile provisioning CLI command.
//!
//! `etutor register` creates (or replaces) a profile row for an owner id.
//! In a deployed setup the identity provider does this on signup; locally
//! it is how you mint a user to chat as.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use engitutor_core::profile::repository::ProfileRepository;
use engitutor_types::profile::Profile;

use crate::state::AppState;

/// Provision a profile for an owner id.
///
/// # Examples
///
/// ```bash
/// etutor register --user <owner-id> --email student@example.edu --name "Ada L."
/// ```
pub async fn register(
    state: &AppState,
    owner_id: Uuid,
    email: String,
    full_name: Option<String>,
    json: bool,
) -> Result<()> {
    let profile = Profile {
        id: owner_id,
        full_name,
        email,
    };
    state.profile_repo.upsert_profile(&profile).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!(
            "  {} Profile registered for {} ({})",
            style("+").green().bold(),
            style(profile.full_name.as_deref().unwrap_or("(no name)")).cyan(),
            style(&profile.email).dim()
        );
    }

    Ok(())
}
