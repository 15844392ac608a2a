//! `neochat sessions` — list or delete saved conversations.

use anyhow::{Context, Result};
use colored::Colorize;

use neochat_core::session::{SessionManager, SessionSummary};

/// Run the sessions command.
pub fn run(delete: Option<&str>) -> Result<()> {
    let sessions = SessionManager::new(None).context("failed to open sessions directory")?;

    if let Some(key) = delete {
        if sessions.delete(key) {
            println!("Deleted session '{key}'.");
        } else {
            println!("{}", format!("No session named '{key}'.").yellow());
        }
        return Ok(());
    }

    let list = sessions.list_sessions();
    if list.is_empty() {
        println!("{}", "No saved sessions.".dimmed());
        return Ok(());
    }

    println!();
    for summary in &list {
        println!("  {}", format_summary(summary));
    }
    println!();

    Ok(())
}

fn format_summary(summary: &SessionSummary) -> String {
    format!(
        "{:<20} {:>4} messages   updated {}",
        summary.key,
        summary.message_count,
        summary.updated_at.format("%Y-%m-%d %H:%M")
    )
}
