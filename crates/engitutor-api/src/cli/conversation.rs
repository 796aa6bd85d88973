//! Conversation management CLI commands: list and delete.
//!
//! Listing renders a rich table; deletion asks for confirmation unless
//! `--force` is passed. Both support `--json` for scripting.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;
use uuid::Uuid;

use engitutor_core::chat::repository::ConversationRepository;

use crate::state::AppState;

/// List an owner's conversations, most recently updated first.
///
/// # Examples
///
/// ```bash
/// etutor list conversations --user <owner-id>
/// etutor list conversations --user <owner-id> --json
/// ```
pub async fn list_conversations(state: &AppState, owner_id: Uuid, json: bool) -> Result<()> {
    let conversations = state.conversation_repo.list_conversations(&owner_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style(format!("etutor chat --user {owner_id}")).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(&conversation.title).fg(Color::Cyan),
            Cell::new(conversation.id.to_string()).fg(Color::DarkGrey),
            Cell::new(conversation.created_at.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::White),
            Cell::new(conversation.updated_at.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete a conversation with confirmation. Its messages go with it.
///
/// # Examples
///
/// ```bash
/// etutor delete conversation <id> --user <owner-id>
/// etutor delete conversation <id> --user <owner-id> --force
/// ```
pub async fn delete_conversation(
    state: &AppState,
    conversation_id: Uuid,
    owner_id: Uuid,
    force: bool,
    json: bool,
) -> Result<()> {
    let conversation = state
        .conversation_repo
        .get_conversation(&conversation_id, &owner_id)
        .await?
        .with_context(|| format!("Conversation '{conversation_id}' not found"))?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete conversation '{}'? All its messages go with it.",
                style(&conversation.title).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state
        .conversation_repo
        .delete_conversation(&conversation_id, &owner_id)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "conversation_id": conversation_id.to_string()})
        );
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("x").red().bold(),
            conversation.title
        );
    }

    Ok(())
}
