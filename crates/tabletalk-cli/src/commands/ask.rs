//! One-shot question about a CSV file

use crate::commands::upload_file;
use crate::console::CliConsole;
use colored::*;
use std::path::Path;
use tabletalk_core::{Registry, ReplyOutcome, TabletalkError, TabletalkResult};

/// Answer `question` about `file` and print the reply
pub async fn ask(file: &Path, question: &str, verbose: bool) -> TabletalkResult<String> {
    let console = CliConsole::new(verbose);
    let mut registry = Registry::new();
    let table_id = upload_file(&mut registry, file).await?;
    let session_id = registry.create_chat_session(&table_id, None)?;
    console.info(&format!("Opened chat session {}", session_id));

    let pending = registry.send_message(&session_id, question)?;
    let answer = pending.content.clone();
    match registry.deliver_reply(pending) {
        ReplyOutcome::Delivered(_) => {}
        other => {
            return Err(TabletalkError::Other(format!(
                "Reply was not delivered: {:?}",
                other
            )));
        }
    }

    println!("{} {}", "assistant:".green().bold(), answer);
    Ok(answer)
}
