//! Neochat CLI — entry point.
//!
//! # Commands
//!
//! - `neochat chat [-m MESSAGE] [-s SESSION] [--logs]` — chat (single-shot or REPL)
//! - `neochat init` — write a default config and create data directories
//! - `neochat tools` — list the tools offered to the model
//! - `neochat sessions [--delete KEY]` — list or delete saved sessions
//! - `neochat status` — show configuration and provider status

mod helpers;
mod init;
mod repl;
mod sessions_cmd;
mod status;
mod tools_cmd;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use neochat_agent::{AgentLoop, ToolRegistry};
use neochat_core::config::{load_config, Config};
use neochat_core::session::SessionManager;
use neochat_providers::http_provider::create_provider;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Neochat — a tool-calling chat assistant in the terminal
#[derive(Parser)]
#[command(name = "neochat", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.neochat/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Session name; the conversation is saved under this key
        #[arg(short, long, default_value = "default")]
        session: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default config and create data directories
    Init,

    /// List the tools offered to the model
    Tools,

    /// List saved sessions
    Sessions {
        /// Delete the session with this key instead of listing
        #[arg(long)]
        delete: Option<String>,
    },

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Chat {
            message,
            session,
            logs,
        } => {
            init_logging(logs);
            let config = load_config(config_path.as_deref());
            run_chat(&config, message, &session).await
        }
        Commands::Init => init::run(config_path.as_deref()),
        Commands::Tools => {
            let config = load_config(config_path.as_deref());
            tools_cmd::run(&config)
        }
        Commands::Sessions { delete } => sessions_cmd::run(delete.as_deref()),
        Commands::Status => status::run(config_path.as_deref()),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(config: &Config, message: Option<String>, session_key: &str) -> Result<()> {
    let agent = build_agent_loop(config)?;
    let sessions = SessionManager::new(None).context("failed to create session manager")?;
    let mut session = sessions.load(session_key);

    match message {
        Some(msg) => {
            info!(session = %session_key, model = agent.model(), "processing single message");
            let outcome = repl::run_session_turn(&agent, &sessions, &mut session, &msg)
                .await
                .context("agent processing failed")?;
            helpers::print_outcome(&outcome);
        }
        None => repl::run(&agent, &sessions, session).await?,
    }

    Ok(())
}

/// Build an `AgentLoop` from the loaded configuration.
pub fn build_agent_loop(config: &Config) -> Result<AgentLoop> {
    let providers_map = config.providers.to_map();
    let provider = create_provider(&config.agent.model, &providers_map)
        .context("failed to create LLM provider")?;

    let tools = ToolRegistry::builtin(&config.tools);

    Ok(AgentLoop::from_config(
        Arc::new(provider),
        Arc::new(tools),
        &config.agent,
    ))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("neochat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
