//! `neochat tools` — list the tools offered to the model.

use anyhow::Result;
use colored::Colorize;

use neochat_agent::ToolRegistry;
use neochat_core::config::Config;

/// Run the tools command.
pub fn run(config: &Config) -> Result<()> {
    let registry = ToolRegistry::builtin(&config.tools);

    println!();
    for def in registry.get_definitions() {
        println!("{}", def.function.name.cyan().bold());
        println!("  {}", def.function.description);
        let schema = serde_json::to_string_pretty(&def.function.parameters)?;
        for line in schema.lines() {
            println!("  {}", line.dimmed());
        }
        println!();
    }

    Ok(())
}
