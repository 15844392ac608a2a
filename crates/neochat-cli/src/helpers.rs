//! Shared CLI helpers — path expansion, response and history printing.

use std::path::PathBuf;

use colored::Colorize;

use neochat_agent::{TurnOutcome, TurnStatus};
use neochat_core::types::Message;
use neochat_core::utils::truncate_string;

/// Max characters of a tool result shown by `/history`.
const HISTORY_RESULT_PREVIEW: usize = 200;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the reply that closed a turn.
pub fn print_outcome(outcome: &TurnOutcome) {
    let reply = outcome.reply().unwrap_or_default();
    println!();
    println!("{}", "Neochat".cyan().bold());
    match outcome.status {
        TurnStatus::Done if reply.is_empty() => println!("{}", "(no response)".dimmed()),
        TurnStatus::Done => println!("{reply}"),
        TurnStatus::ToolFailed => println!("{}", reply.red()),
        TurnStatus::IterationLimit => println!("{}", reply.yellow()),
    }
    println!();
}

/// One line per message, tool calls and results included.
pub fn format_history(messages: &[Message]) -> Vec<String> {
    let mut lines = Vec::new();
    for msg in messages {
        match msg {
            Message::User { content } => lines.push(format!("you: {content}")),
            Message::Assistant { content, tool_calls } => {
                if let Some(text) = content.as_deref().filter(|t| !t.is_empty()) {
                    lines.push(format!("assistant: {text}"));
                }
                for call in tool_calls.iter().flatten() {
                    lines.push(format!(
                        "assistant → {}({}) [{}]",
                        call.name(),
                        call.function.arguments,
                        call.id
                    ));
                }
            }
            Message::Tool {
                content,
                tool_call_id,
            } => lines.push(format!(
                "tool [{tool_call_id}]: {}",
                truncate_string(content, HISTORY_RESULT_PREVIEW)
            )),
        }
    }
    lines
}

/// Print the full conversation for `/history`.
pub fn print_history(messages: &[Message]) {
    println!();
    if messages.is_empty() {
        println!("{}", "(empty conversation)".dimmed());
    }
    for line in format_history(messages) {
        if line.starts_with("you:") {
            println!("{}", line.green());
        } else if line.starts_with("tool") {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(session_key: &str, history_len: usize) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Neochat".cyan().bold(), version.dimmed());
    println!(
        "{}",
        format!("Session '{session_key}' ({history_len} messages).").dimmed()
    );
    println!(
        "{}",
        "Type a message, /history, /reset, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
