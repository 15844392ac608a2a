//! `neochat status` — show configuration, provider and tool status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use neochat_core::config::schema::resolve_model_alias;
use neochat_core::config::{get_config_path, load_config};
use neochat_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Neochat Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    // Agent
    let agent = &config.agent;
    println!(
        "  {:<18} {}",
        "Model:".bold(),
        resolve_model_alias(&agent.model)
    );
    println!(
        "  {:<18} {} | {} | {}",
        "Parameters:".bold(),
        format!("temp: {}", agent.temperature).dimmed(),
        format!("max_tokens: {}", agent.max_tokens).dimmed(),
        format!("tool_choice: {}", agent.tool_choice).dimmed(),
    );
    let iterations = if agent.max_tool_iterations == 0 {
        "unbounded".to_string()
    } else {
        agent.max_tool_iterations.to_string()
    };
    println!("  {:<18} {}", "Max iterations:".bold(), iterations);

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let status = match config.providers.get_by_name(spec.name) {
            Some(p) if p.is_configured() => format!("{} (key set)", "✓".green()),
            Some(p) if p.api_base.is_some() => format!("{} (endpoint set)", "✓".green()),
            _ => format!("{}", "· not configured".dimmed()),
        };
        println!("    {:<20} {}", spec.display_name, status);
    }

    // Tools
    let tools = &config.tools;
    println!();
    println!("  {}", "Tools:".bold());
    println!(
        "    {:<20} {} (timeout {}s, max {}s)",
        "execute_python",
        tools.python.interpreter,
        tools.python.timeout,
        tools.python.max_timeout
    );
    println!(
        "    {:<20} timeout {}s, max {} chars",
        "browse_web", tools.web.fetch_timeout, tools.web.max_chars
    );
    println!(
        "    {:<20} {} ({} results)",
        "search_web", tools.search.endpoint, tools.search.max_results
    );
    println!(
        "    {:<20} {}",
        "fetch_wikipedia_summary", tools.wikipedia.api_base
    );
    println!(
        "    {:<20} timeout {}s, max {} chars",
        "parse_online_pdf", tools.pdf.timeout, tools.pdf.max_chars
    );

    println!();

    Ok(())
}
