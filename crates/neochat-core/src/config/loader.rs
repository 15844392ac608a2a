//! Config loader — reads `~/.neochat/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.neochat/config.json`
//! 3. Environment variables `NEOCHAT_<SECTION>__<FIELD>` (override JSON)
//! 4. Conventional provider key variables (`OPENAI_API_KEY`, …) fill keys
//!    that are still empty

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `NEOCHAT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `NEOCHAT_AGENT__MODEL`, `NEOCHAT_AGENT__MAX_TOKENS`, `NEOCHAT_AGENT__TEMPERATURE`
/// - `NEOCHAT_AGENT__TOOL_CHOICE`, `NEOCHAT_AGENT__MAX_TOOL_ITERATIONS`
/// - `NEOCHAT_PROVIDERS__<NAME>__API_KEY`, `NEOCHAT_PROVIDERS__<NAME>__API_BASE`
/// - `NEOCHAT_TOOLS__PYTHON__INTERPRETER`, `NEOCHAT_TOOLS__PYTHON__TIMEOUT`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("NEOCHAT_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Ok(val) = std::env::var("NEOCHAT_AGENT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("NEOCHAT_AGENT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.agent.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("NEOCHAT_AGENT__TOOL_CHOICE") {
        match val.parse() {
            Ok(choice) => config.agent.tool_choice = choice,
            Err(e) => warn!("Ignoring NEOCHAT_AGENT__TOOL_CHOICE: {}", e),
        }
    }
    if let Ok(val) = std::env::var("NEOCHAT_AGENT__MAX_TOOL_ITERATIONS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tool_iterations = n;
        }
    }

    apply_provider_env(&mut config.providers.openai, "OPENAI");
    apply_provider_env(&mut config.providers.openrouter, "OPENROUTER");
    apply_provider_env(&mut config.providers.anthropic, "ANTHROPIC");
    apply_provider_env(&mut config.providers.deepseek, "DEEPSEEK");
    apply_provider_env(&mut config.providers.groq, "GROQ");
    apply_provider_env(&mut config.providers.vllm, "VLLM");

    let providers = &mut config.providers;
    let fallbacks = [
        (&mut providers.openai, "OPENAI_API_KEY"),
        (&mut providers.openrouter, "OPENROUTER_API_KEY"),
        (&mut providers.anthropic, "ANTHROPIC_API_KEY"),
        (&mut providers.deepseek, "DEEPSEEK_API_KEY"),
        (&mut providers.groq, "GROQ_API_KEY"),
        (&mut providers.vllm, "HOSTED_VLLM_API_KEY"),
    ];
    for (provider, var) in fallbacks {
        if !provider.is_configured() {
            if let Ok(key) = std::env::var(var) {
                debug!("using API key from {}", var);
                provider.api_key = key;
            }
        }
    }

    if let Ok(val) = std::env::var("NEOCHAT_TOOLS__PYTHON__INTERPRETER") {
        config.tools.python.interpreter = val;
    }
    if let Ok(val) = std::env::var("NEOCHAT_TOOLS__PYTHON__TIMEOUT") {
        if let Ok(n) = val.parse::<u64>() {
            config.tools.python.timeout = n;
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("NEOCHAT_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("NEOCHAT_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
