//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ProvidersConfig`, `ToolsConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::ToolChoice;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.neochat/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub providers: ProvidersConfig,
    pub tools: ToolsConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Model shortcuts accepted in place of a full model identifier.
pub const MODEL_ALIASES: &[(&str, &str)] = &[
    ("o1", "openai/o1"),
    ("o1-mini", "openai/o1-mini"),
    ("gpt-4", "openai/gpt-4"),
    ("gpt-4o", "openai/gpt-4o"),
    ("gpt-4o-mini", "openai/gpt-4o-mini"),
    ("default", DEFAULT_MODEL),
];

/// Model used when nothing is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Resolve a model alias (`"gpt-4o"`, `"default"`) to its full identifier.
/// Anything that is not an alias is returned unchanged.
pub fn resolve_model_alias(model: &str) -> String {
    let lower = model.trim().to_lowercase();
    MODEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, full)| full.to_string())
        .unwrap_or_else(|| model.trim().to_string())
}

/// Settings for the orchestration loop and its completion calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// LLM model identifier or alias.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Tool-choice policy sent with every completion call.
    pub tool_choice: ToolChoice,
    /// Maximum completion calls per user turn. `0` disables the bound.
    pub max_tool_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            tool_choice: ToolChoice::Auto,
            max_tool_iterations: 20,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub vllm: ProviderConfig,
}

impl ProvidersConfig {
    fn entries(&self) -> [(&'static str, &ProviderConfig); 6] {
        [
            ("openai", &self.openai),
            ("openrouter", &self.openrouter),
            ("anthropic", &self.anthropic),
            ("deepseek", &self.deepseek),
            ("groq", &self.groq),
            ("vllm", &self.vllm),
        ]
    }

    /// Get a provider config by name (e.g. `"openai"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }

    /// Convert to a map for use with the provider registry.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        self.entries()
            .into_iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// Settings for the built-in tools.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    pub python: PythonToolConfig,
    pub web: WebToolConfig,
    pub search: SearchToolConfig,
    pub wikipedia: WikipediaToolConfig,
    pub pdf: PdfToolConfig,
}

/// Sandboxed Python execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PythonToolConfig {
    /// Interpreter binary.
    pub interpreter: String,
    /// Default timeout in seconds.
    pub timeout: u64,
    /// Upper bound for a per-call timeout requested by the model.
    pub max_timeout: u64,
}

impl Default for PythonToolConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout: 5,
            max_timeout: 60,
        }
    }
}

/// Web page fetching.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebToolConfig {
    /// Default timeout in seconds.
    pub fetch_timeout: u64,
    /// Maximum characters of page text returned to the model.
    pub max_chars: usize,
}

impl Default for WebToolConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: 10,
            max_chars: 50_000,
        }
    }
}

/// Web search (DuckDuckGo HTML endpoint).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchToolConfig {
    pub endpoint: String,
    /// Default number of results.
    pub max_results: u32,
}

impl Default for SearchToolConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            max_results: 5,
        }
    }
}

/// Wikipedia REST summaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WikipediaToolConfig {
    pub api_base: String,
}

impl Default for WikipediaToolConfig {
    fn default() -> Self {
        Self {
            api_base: "https://en.wikipedia.org/api/rest_v1".to_string(),
        }
    }
}

/// Online PDF parsing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfToolConfig {
    /// Download timeout in seconds.
    pub timeout: u64,
    /// Maximum characters of extracted text returned to the model.
    pub max_chars: usize,
}

impl Default for PdfToolConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            max_chars: 100_000,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
