//! Provider registry — static specs for the supported completion backends.
//!
//! Each `ProviderSpec` describes how to reach one OpenAI-compatible
//! `/chat/completions` endpoint: keywords for model matching, the
//! conventional API-key variable, the default base URL, and model quirks.
//!
//! Model identifiers are written `vendor/model` (e.g. `"openai/gpt-4o-mini"`).
//! Direct providers receive the bare model name; gateways receive the full
//! identifier because they route by vendor.

use std::collections::HashMap;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name, also the config key (e.g. `"openrouter"`).
    pub name: &'static str,
    /// Keywords to match in model names (lowercase). E.g. `&["gpt", "openai"]`.
    pub keywords: &'static [&'static str],
    /// Conventional environment variable for the API key.
    pub env_key: &'static str,
    /// Human-readable name for logs. E.g. `"OpenRouter"`.
    pub display_name: &'static str,
    /// Routing prefixes removed before the model name is sent.
    /// E.g. `&["deepseek/"]` turns `"deepseek/deepseek-chat"` into `"deepseek-chat"`.
    pub strip_prefixes: &'static [&'static str],
    /// Whether this is a gateway/aggregator. Gateways are the fallback when
    /// no direct provider matches a model.
    pub is_gateway: bool,
    /// If the API key starts with this prefix, the key belongs to this provider.
    pub detect_by_key_prefix: Option<&'static str>,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Per-model parameter overrides.
    pub model_overrides: &'static [ModelOverride],
}

/// A per-model parameter override.
#[derive(Clone, Debug)]
pub struct ModelOverride {
    /// Prefix matched against the lowercase bare model name.
    pub model_prefix: &'static str,
    /// The field to override.
    pub field: OverrideField,
}

/// Fields that can be overridden per model.
#[derive(Clone, Debug)]
pub enum OverrideField {
    /// Force a fixed temperature.
    Temperature(f64),
}

// ─────────────────────────────────────────────
// Supported providers (in matching priority order)
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications, in matching priority order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // OpenRouter — gateway, matched by key prefix "sk-or-"
    ProviderSpec {
        name: "openrouter",
        keywords: &["openrouter"],
        env_key: "OPENROUTER_API_KEY",
        display_name: "OpenRouter",
        strip_prefixes: &["openrouter/"],
        is_gateway: true,
        detect_by_key_prefix: Some("sk-or-"),
        default_api_base: "https://openrouter.ai/api/v1",
        model_overrides: &[],
    },
    // OpenAI — reasoning models only accept the default temperature
    ProviderSpec {
        name: "openai",
        keywords: &["openai", "gpt"],
        env_key: "OPENAI_API_KEY",
        display_name: "OpenAI",
        strip_prefixes: &["openai/"],
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: "https://api.openai.com/v1",
        model_overrides: &[
            ModelOverride {
                model_prefix: "o1",
                field: OverrideField::Temperature(1.0),
            },
            ModelOverride {
                model_prefix: "o3",
                field: OverrideField::Temperature(1.0),
            },
        ],
    },
    // Anthropic (OpenAI-compatible endpoint)
    ProviderSpec {
        name: "anthropic",
        keywords: &["anthropic", "claude"],
        env_key: "ANTHROPIC_API_KEY",
        display_name: "Anthropic",
        strip_prefixes: &["anthropic/"],
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: "https://api.anthropic.com/v1",
        model_overrides: &[],
    },
    ProviderSpec {
        name: "deepseek",
        keywords: &["deepseek"],
        env_key: "DEEPSEEK_API_KEY",
        display_name: "DeepSeek",
        strip_prefixes: &["deepseek/"],
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: "https://api.deepseek.com/v1",
        model_overrides: &[],
    },
    ProviderSpec {
        name: "groq",
        keywords: &["groq"],
        env_key: "GROQ_API_KEY",
        display_name: "Groq",
        strip_prefixes: &["groq/"],
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: "https://api.groq.com/openai/v1",
        model_overrides: &[],
    },
    // vLLM (self-hosted)
    ProviderSpec {
        name: "vllm",
        keywords: &["vllm"],
        env_key: "HOSTED_VLLM_API_KEY",
        display_name: "vLLM",
        strip_prefixes: &["hosted_vllm/", "vllm/"],
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: "http://localhost:8000/v1",
        model_overrides: &[],
    },
];

// ─────────────────────────────────────────────
// Matching functions
// ─────────────────────────────────────────────

/// Find a provider spec by matching keywords against a model name.
///
/// Skips gateways — those are fallback only.
/// Returns the first match in priority order.
pub fn find_by_model(model: &str) -> Option<&'static ProviderSpec> {
    let model_lower = model.to_lowercase();
    PROVIDERS.iter().find(|spec| {
        !spec.is_gateway && spec.keywords.iter().any(|kw| model_lower.contains(kw))
    })
}

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Find a gateway that owns the given API key, judged by its prefix.
pub fn find_gateway_by_key(api_key: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|s| {
        s.is_gateway
            && s.detect_by_key_prefix
                .is_some_and(|pfx| api_key.starts_with(pfx))
    })
}

/// Resolve the model name sent on the wire.
///
/// Strips the first matching routing prefix of `spec`; everything else is
/// passed through unchanged.
pub fn resolve_model_name(model: &str, spec: &ProviderSpec) -> String {
    spec.strip_prefixes
        .iter()
        .find_map(|prefix| model.strip_prefix(prefix))
        .unwrap_or(model)
        .to_string()
}

/// Apply per-model overrides to the sampling temperature.
pub fn apply_model_overrides(model: &str, spec: &ProviderSpec, temperature: f64) -> f64 {
    let bare = resolve_model_name(model, spec).to_lowercase();

    spec.model_overrides
        .iter()
        .filter(|ovr| bare.starts_with(ovr.model_prefix))
        .fold(temperature, |_, ovr| match ovr.field {
            OverrideField::Temperature(value) => value,
        })
}

/// Re-export the provider config from core — single source of truth.
pub use neochat_core::config::schema::ProviderConfig;

/// Match a model name to a configured provider.
///
/// 1. Find by keyword match, only if that provider has an API key
///    (or, for vLLM, an API base).
/// 2. Fallback to the first configured gateway.
pub fn match_provider<'a>(
    model: &str,
    providers: &'a HashMap<String, ProviderConfig>,
) -> Option<(&'a ProviderConfig, &'static ProviderSpec)> {
    // 1. Direct keyword match; a gateway key stored under a direct
    //    provider still routes through the gateway
    if let Some(spec) = find_by_model(model) {
        if let Some(config) = providers.get(spec.name) {
            if config.is_configured() {
                let spec = find_gateway_by_key(&config.api_key).unwrap_or(spec);
                return Some((config, spec));
            }
            if spec.name == "vllm" && config.api_base.is_some() {
                return Some((config, spec));
            }
        }
    }

    // 2. Fallback to first configured gateway
    PROVIDERS
        .iter()
        .filter(|s| s.is_gateway)
        .find_map(|spec| {
            providers
                .get(spec.name)
                .filter(|c| c.is_configured())
                .map(|c| (c, spec))
        })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
