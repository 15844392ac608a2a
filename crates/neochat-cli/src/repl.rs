//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. The
//! conversation lives in a [`Session`] that is saved after every turn.

use anyhow::{Context, Result};
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use neochat_agent::{AgentLoop, TurnOutcome};
use neochat_core::session::SessionManager;
use neochat_core::types::{Message, Session};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// What a line of input asks the REPL to do.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    History,
    Reset,
    Query(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let lower = trimmed.to_lowercase();
    if EXIT_COMMANDS.contains(&lower.as_str()) {
        return Input::Exit;
    }
    match lower.as_str() {
        "/history" => Input::History,
        "/reset" => Input::Reset,
        _ => Input::Query(trimmed),
    }
}

/// Run one turn on the session's conversation and persist what it added.
///
/// On error, including a failed save, the session is left untouched.
pub async fn run_session_turn(
    agent: &AgentLoop,
    sessions: &SessionManager,
    session: &mut Session,
    query: &str,
) -> Result<TurnOutcome> {
    let before = session.conversation.len();
    let outcome = agent.run_turn(query, session.conversation.clone()).await?;

    let mut updated = session.clone();
    updated.conversation = outcome.conversation.clone();
    let added: Vec<Message> = updated.conversation.messages()[before..].to_vec();
    sessions
        .append(&mut updated, &added)
        .with_context(|| format!("failed to save session '{}'", session.key))?;
    *session = updated;

    debug!(
        session = %session.key,
        added = added.len(),
        iterations = outcome.iterations,
        total_tokens = outcome.usage.total_tokens,
        "turn saved"
    );
    Ok(outcome)
}

/// Run the interactive REPL loop.
pub async fn run(agent: &AgentLoop, sessions: &SessionManager, mut session: Session) -> Result<()> {
    helpers::print_banner(&session.key, session.conversation.len());

    let mut editor = create_editor()?;

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        match classify(&line) {
            Input::Empty => continue,
            Input::Exit => {
                println!("\nGoodbye!");
                break;
            }
            Input::History => {
                helpers::print_history(session.conversation.messages());
                continue;
            }
            Input::Reset => {
                sessions
                    .clear(&mut session)
                    .with_context(|| format!("failed to reset session '{}'", session.key))?;
                println!("Conversation cleared.\n");
                continue;
            }
            Input::Query(query) => {
                let _ = editor.add_history_entry(query);
                helpers::print_thinking();

                let result = run_session_turn(agent, sessions, &mut session, query).await;
                helpers::clear_thinking();
                match result {
                    Ok(outcome) => helpers::print_outcome(&outcome),
                    Err(e) => eprintln!("\nError: {e:#}\n"),
                }
            }
        }
    }

    save_history(&mut editor);
    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    neochat_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
