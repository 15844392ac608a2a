//! LLM Provider trait — the completion client seam.
//!
//! Every LLM backend (OpenAI, OpenRouter, DeepSeek, Groq, …) implements this trait.
//! The `HttpProvider` in `http_provider.rs` covers all OpenAI-compatible APIs;
//! tests substitute a scripted implementation.

use async_trait::async_trait;
use neochat_core::types::{LlmResponse, Message, ToolChoice, ToolDefinition};

use crate::error::ProviderError;

/// Sampling parameters passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages`    — Conversation history in OpenAI format.
    /// * `tools`       — Tool definitions the model may call.
    /// * `tool_choice` — How the model may use `tools`; ignored when `tools` is `None`.
    /// * `model`       — Model identifier (e.g. `"openai/gpt-4o-mini"`).
    /// * `config`      — Temperature, max_tokens.
    ///
    /// # Returns
    /// The first choice of the completion, or a [`ProviderError`] when the
    /// call fails or the response carries no choice at all.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        tool_choice: ToolChoice,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
