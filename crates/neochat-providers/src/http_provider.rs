//! Generic HTTP-based completion client for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint: OpenAI, OpenRouter,
//! DeepSeek, Groq, Anthropic's compatibility layer, and self-hosted vLLM.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use neochat_core::config::schema::resolve_model_alias;
use neochat_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolChoice,
    ToolDefinition,
};

use crate::error::ProviderError;
use crate::registry::{apply_model_overrides, resolve_model_name, ProviderConfig, ProviderSpec};
use crate::traits::{LlmProvider, LlmRequestConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A completion client that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication. Empty for unauthenticated local servers.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Reference to the provider spec for model resolution and overrides.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config and spec.
    ///
    /// # Arguments
    /// * `config`  — User's config (api_key, api_base, extra_headers)
    /// * `spec`    — Static provider spec from the registry
    /// * `model`   — The default model to use
    pub fn new(
        config: &ProviderConfig,
        spec: &'static ProviderSpec,
        model: &str,
    ) -> Result<Self, ProviderError> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
            extra_headers,
            spec,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Resolve the model name for this provider (strip routing prefix).
    fn resolve_model(&self, model: &str) -> String {
        resolve_model_name(model, self.spec)
    }

    fn name(&self) -> String {
        self.spec.display_name.to_string()
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        tool_choice: ToolChoice,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError> {
        let resolved_model = self.resolve_model(model);
        let temperature = apply_model_overrides(model, self.spec, config.temperature);

        debug!(
            provider = self.spec.display_name,
            model = %resolved_model,
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            tool_choice = %tool_choice,
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: resolved_model,
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| tool_choice),
            max_tokens: Some(config.max_tokens),
            temperature: Some(temperature),
        };

        let mut request = self
            .client
            .post(self.completions_url())
            .headers(self.extra_headers.clone())
            .json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
            ProviderError::Http {
                provider: self.name(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(ProviderError::Api {
                provider: self.name(),
                status: status.as_u16(),
                body,
            });
        }

        let chat_resp = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(
                    provider = self.spec.display_name,
                    error = %e,
                    "Failed to parse LLM response"
                );
                ProviderError::InvalidResponse {
                    provider: self.name(),
                    reason: e.to_string(),
                }
            })?;

        let llm_resp = chat_resp
            .into_response()
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: self.name(),
            })?;

        debug!(
            provider = self.spec.display_name,
            has_content = llm_resp.content.is_some(),
            tool_calls = llm_resp.tool_calls.len(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );
        Ok(llm_resp)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an HttpProvider from a model name (or alias) and the provider configs.
///
/// This is the main entry point: it resolves the alias, matches the model
/// to a configured provider, and creates the HttpProvider.
pub fn create_provider(
    model: &str,
    providers: &HashMap<String, ProviderConfig>,
) -> Result<HttpProvider, ProviderError> {
    let model = resolve_model_alias(model);
    let (config, spec) = crate::registry::match_provider(&model, providers).ok_or_else(|| {
        ProviderError::NotConfigured {
            model: model.clone(),
        }
    })?;

    debug!(
        provider = spec.display_name,
        model = %model,
        api_base = config.api_base.as_deref().unwrap_or(spec.default_api_base),
        "Creating LLM provider"
    );

    HttpProvider::new(config, spec, &model)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use neochat_core::types::ToolCall;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            extra_headers: None,
        }
    }

    fn provider_for(name: &str, config: &ProviderConfig) -> HttpProvider {
        HttpProvider::new(config, find_by_name(name).unwrap(), "openai/gpt-4o-mini").unwrap()
    }

    fn search_tool() -> ToolDefinition {
        ToolDefinition::new(
            "search_web",
            "Search the web",
            serde_json::json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        )
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let config = make_config("key", Some("https://api.openai.com/v1/"));
        let provider = provider_for("openai", &config);
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base_for_gateway() {
        let config = make_config("sk-or-abc", None);
        let provider = provider_for("openrouter", &config);
        assert_eq!(provider.api_base, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_config_overrides_default_base() {
        let config = make_config("sk-or-abc", Some("https://custom.proxy.com/v1"));
        let provider = provider_for("openrouter", &config);
        assert_eq!(provider.api_base, "https://custom.proxy.com/v1");
    }

    #[test]
    fn test_extra_headers() {
        let mut headers = HashMap::new();
        headers.insert("X-Title".to_string(), "neochat".to_string());
        let config = ProviderConfig {
            api_key: "key".to_string(),
            api_base: None,
            extra_headers: Some(headers),
        };
        let provider = provider_for("openrouter", &config);
        assert!(provider.extra_headers.contains_key("x-title"));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_chat_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "content": "Hello there.", "tool_calls": null },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("test-key-123", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let resp = provider
            .chat(
                &[Message::user("Hello")],
                None,
                ToolChoice::Auto,
                "openai/gpt-4o-mini",
                &LlmRequestConfig::default(),
            )
            .await
            .unwrap();

        assert_eq!(resp.content.as_deref(), Some("Hello there."));
        assert!(!resp.has_tool_calls());
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn test_chat_with_tool_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-tools",
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [
                            {
                                "id": "call_1",
                                "type": "function",
                                "function": { "name": "search_web", "arguments": "{\"query\": \"rust\"}" }
                            },
                            {
                                "id": "call_2",
                                "type": "function",
                                "function": { "name": "search_web", "arguments": "{\"query\": \"tokio\"}" }
                            }
                        ]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let resp = provider
            .chat(
                &[Message::user("Search for Rust")],
                Some(&[search_tool()]),
                ToolChoice::Auto,
                "openai/gpt-4o-mini",
                &LlmRequestConfig::default(),
            )
            .await
            .unwrap();

        assert!(resp.content.is_none());
        let ids: Vec<&str> = resp.tool_calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["call_1", "call_2"]);
        assert_eq!(resp.tool_calls[0].name(), "search_web");
    }

    #[tokio::test]
    async fn test_chat_sends_bare_model_and_tool_choice() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "tool_choice": "required",
                "max_tokens": 4096
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "ok" }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let resp = provider
            .chat(
                &[Message::user("test")],
                Some(&[search_tool()]),
                ToolChoice::Required,
                "openai/gpt-4o-mini",
                &LlmRequestConfig::default(),
            )
            .await;

        // A body mismatch makes wiremock answer 404, which surfaces as Api
        assert_eq!(resp.unwrap().content.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_chat_omits_tool_choice_without_tools() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "ok" }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);
        provider
            .chat(
                &[Message::user("test")],
                None,
                ToolChoice::Required,
                "gpt-4o",
                &LlmRequestConfig::default(),
            )
            .await
            .unwrap();

        let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_chat_replays_tool_threading() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    { "role": "user", "content": "q" },
                    { "role": "assistant", "tool_calls": [{ "id": "c1", "type": "function" }] },
                    { "role": "tool", "tool_call_id": "c1", "content": "{}" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "done" }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);
        let messages = vec![
            Message::user("q"),
            Message::assistant_tool_calls(vec![ToolCall::new("c1", "search_web", "{}")]),
            Message::tool_result("c1", "{}"),
        ];

        let resp = provider
            .chat(&messages, None, ToolChoice::Auto, "gpt-4o", &LlmRequestConfig::default())
            .await
            .unwrap();
        assert_eq!(resp.content.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_chat_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit_error" }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let err = provider
            .chat(&[Message::user("Hello")], None, ToolChoice::Auto, "gpt-4o", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        match err {
            ProviderError::Api { status, body, .. } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-empty",
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let err = provider
            .chat(&[Message::user("Hello")], None, ToolChoice::Auto, "gpt-4o", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let provider = provider_for("openai", &config);

        let err = provider
            .chat(&[Message::user("Hello")], None, ToolChoice::Auto, "gpt-4o", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_chat_network_error() {
        // Point to a port that's not listening
        let config = make_config("key", Some("http://127.0.0.1:1"));
        let provider = provider_for("openai", &config);

        let err = provider
            .chat(&[Message::user("Hello")], None, ToolChoice::Auto, "gpt-4o", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http { .. }));
    }

    // ── create_provider ──

    #[test]
    fn test_create_provider_resolves_alias() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), make_config("sk-123", None));

        let provider = create_provider("gpt-4o", &providers).unwrap();
        assert_eq!(provider.display_name(), "OpenAI");
        assert_eq!(provider.default_model(), "openai/gpt-4o");
    }

    #[test]
    fn test_create_provider_no_config() {
        let providers = HashMap::new();
        let err = create_provider("o1-mini", &providers).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured { ref model } if model == "openai/o1-mini"));
    }
}
