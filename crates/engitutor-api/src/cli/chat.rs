//! Interactive tutoring chat session.
//!
//! Drives a [`SessionController`] from the terminal: binds or creates a
//! conversation, replays any existing transcript, then loops on async
//! readline input, showing a spinner while the provider is thinking.

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline_async::{Readline, ReadlineEvent};
use tracing::info;
use uuid::Uuid;

use engitutor_types::chat::{ChatMessage, MessageRole};
use engitutor_types::error::SendError;

use crate::state::AppState;

/// Run the interactive chat loop for one owner.
pub async fn run_chat(
    state: &AppState,
    owner_id: Uuid,
    conversation_id: Option<Uuid>,
) -> anyhow::Result<()> {
    let mut controller = state.controller(owner_id);
    controller.ensure(conversation_id).await?;

    // ensure() always leaves a bound conversation behind.
    let conversation = controller
        .conversation()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no conversation bound"))?;

    print_banner(&conversation.title, &conversation.id);
    for message in controller.transcript() {
        print_message(message);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, _writer) = Readline::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match input.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let text = line.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                if text == "/exit" || text == "/quit" {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                if text == "/clear" {
                    let _ = input.clear();
                    continue;
                }

                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg}")
                        .unwrap(),
                );
                spinner.set_message("thinking...");
                spinner.enable_steady_tick(Duration::from_millis(80));

                let started = Instant::now();
                let result = controller.send(&text).await;
                spinner.finish_and_clear();

                match result {
                    Ok(Some(outcome)) => {
                        println!(
                            "\n  {} {}",
                            style("Tutor >").cyan().bold(),
                            outcome.assistant_message.content.trim()
                        );
                        let seconds = started.elapsed().as_millis() as f64 / 1000.0;
                        println!("  {}\n", style(format!("{seconds:.1}s")).dim());

                        if !outcome.user_persisted.is_saved()
                            || !outcome.assistant_persisted.is_saved()
                        {
                            eprintln!(
                                "  {} This exchange was not fully saved.\n",
                                style("!").yellow().bold()
                            );
                        }
                        if outcome.title_updated {
                            info!(conversation_id = %conversation.id, "Conversation titled");
                        }
                    }
                    Ok(None) => {}
                    Err(SendError::Relay(e)) => {
                        eprintln!("\n  {} {e}", style("!").red().bold());
                        eprintln!(
                            "  {}\n",
                            style("Type another message to retry, /exit to quit.").dim()
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(ReadlineEvent::Eof) => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            Ok(ReadlineEvent::Interrupted) => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            Err(_) => break,
        }
    }

    Ok(())
}

fn print_banner(title: &str, conversation_id: &Uuid) {
    println!();
    println!("  {}", style("EngiTutor").cyan().bold());
    println!(
        "  {} {}",
        style(title).bold(),
        style(format!("({conversation_id})")).dim()
    );
    println!(
        "  {}",
        style("Ctrl+D or /exit to quit, /clear to clear the screen.").dim()
    );
    println!();
}

fn print_message(message: &ChatMessage) {
    let label = match message.role {
        MessageRole::User => style("You >").green().bold(),
        MessageRole::Assistant => style("Tutor >").cyan().bold(),
        MessageRole::System => style("System >").dim(),
    };
    println!("  {} {}\n", label, message.content.trim());
}
