//! Interactive chat about a CSV file

use crate::commands::upload_file;
use crate::console::CliConsole;
use colored::*;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::Path;
use tabletalk_core::{
    Registry, ReplyOutcome, ReplyScheduler, TabletalkConfig, TabletalkError, TabletalkResult,
};

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Run a chat loop until the user types `exit` or `quit`
pub async fn chat(file: &Path, config: &TabletalkConfig, verbose: bool) -> TabletalkResult<()> {
    let console = CliConsole::new(verbose);
    let mut registry = Registry::new();
    let table_id = upload_file(&mut registry, file).await?;
    let session_id = registry.create_chat_session(&table_id, None)?;

    if let Some(session) = registry.session(&session_id) {
        console.print_header(&session.name);
        if let Some(greeting) = session.last_message() {
            println!("{} {}", "assistant:".green().bold(), greeting.content);
        }
    }
    console.info(&format!(
        "Replies arrive after {} ms; type 'exit' to leave",
        config.chat.reply_delay_ms
    ));

    let shared = registry.into_shared();
    let scheduler = ReplyScheduler::new(shared.clone(), config.chat.reply_delay());
    let theme = ColorfulTheme::default();

    loop {
        let input: String = Input::with_theme(&theme)
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| TabletalkError::Io(e.to_string()))?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        let pending = shared.lock().send_message(&session_id, input)?;
        eprintln!("{}", "thinking...".dimmed());

        match scheduler.schedule(pending).wait().await {
            ReplyOutcome::Delivered(message_id) => {
                let registry = shared.lock();
                let reply = registry
                    .session(&session_id)
                    .and_then(|s| s.messages.iter().find(|m| m.id == message_id))
                    .map(|m| m.content.clone());
                drop(registry);
                if let Some(reply) = reply {
                    println!("{} {}", "assistant:".green().bold(), reply);
                }
            }
            ReplyOutcome::SessionGone => {
                console.warn("The chat session is gone");
                break;
            }
            ReplyOutcome::Cancelled => console.warn("Reply cancelled"),
        }
    }

    let count = shared
        .lock()
        .session(&session_id)
        .map(|s| s.messages.len())
        .unwrap_or(0);
    console.success(&format!("Chat ended after {} messages", count));
    Ok(())
}
