//! `neochat init` — write a default config and create the data directories.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use neochat_core::config::{get_config_path, save_config, Config};
use neochat_core::utils::{get_data_path, get_sessions_path};

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "Neochat Setup".cyan().bold());
    println!();

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        // Keys picked up from the environment are not written to disk.
        save_config(&Config::default(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let sessions_dir = get_sessions_path();
    std::fs::create_dir_all(&sessions_dir)?;
    std::fs::create_dir_all(get_data_path().join("history"))?;
    println!("  {} sessions at {}", "✓".green(), sessions_dir.display());

    println!();
    println!(
        "{}",
        "Set an API key (e.g. OPENAI_API_KEY) or edit the config, then run `neochat chat`."
            .dimmed()
    );
    println!();

    Ok(())
}
