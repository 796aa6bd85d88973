//! CLI command definitions and dispatch for the `etutor` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! verb-noun pattern (e.g., `etutor list conversations`).

pub mod chat;
pub mod conversation;
pub mod profile;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// AI tutoring chat for engineering students.
#[derive(Parser)]
#[command(name = "etutor", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Host to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Start an interactive tutoring chat session.
    Chat {
        /// Owner id (UUID) to chat as.
        #[arg(long)]
        user: Uuid,

        /// Resume an existing conversation instead of starting a new one.
        #[arg(long)]
        conversation: Option<Uuid>,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Provision a profile for an owner id (normally the identity
    /// provider's job; useful for local setups).
    Register {
        /// Owner id (UUID).
        #[arg(long)]
        user: Uuid,

        /// Email address (read-only after registration).
        #[arg(long)]
        email: String,

        /// Full name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List an owner's conversations, most recently updated first.
    Conversations {
        /// Owner id (UUID).
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a conversation and all its messages.
    Conversation {
        /// Conversation id.
        id: Uuid,

        /// Owner id (UUID).
        #[arg(long)]
        user: Uuid,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}
