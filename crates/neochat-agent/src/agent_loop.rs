//! Agent loop — the LLM ↔ tool-calling state machine.
//!
//! One call to [`AgentLoop::run_turn`] handles one user query: it appends the
//! query, asks the model for a response, dispatches any requested tools in
//! emitted order, and repeats until the model answers in plain text. The
//! first tool failure ends the turn with a single assistant error message.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use neochat_core::config::schema::{resolve_model_alias, AgentConfig};
use neochat_core::types::{Message, ToolCall, ToolChoice, UsageInfo};
use neochat_core::Conversation;
use neochat_providers::traits::{LlmProvider, LlmRequestConfig};

use crate::error::AgentError;
use crate::tools::registry::ToolRegistry;

/// Default maximum completion calls per user turn.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

// ─────────────────────────────────────────────
// Turn state and outcome
// ─────────────────────────────────────────────

/// Where a turn currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting on the completion call.
    AwaitingModel,
    /// Running the tool calls from the last model response.
    DispatchingTools,
    /// The model produced a plain answer.
    Done,
    /// A tool call failed and the turn was closed with an error message.
    Failed,
}

/// How a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// The model produced a final answer.
    Done,
    /// A tool call failed; the last message is the error text.
    ToolFailed,
    /// The completion-call bound was reached before a final answer.
    IterationLimit,
}

/// Result of one user turn.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// The full history, including everything appended this turn.
    pub conversation: Conversation,
    pub status: TurnStatus,
    /// Number of completion calls made.
    pub iterations: usize,
    /// Token usage summed over all completion calls in the turn.
    pub usage: UsageInfo,
}

impl TurnOutcome {
    /// Text of the last message, i.e. the answer or error shown to the user.
    pub fn reply(&self) -> Option<&str> {
        self.conversation.last().and_then(Message::content)
    }
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// Drives completion calls and tool dispatch for one conversation turn.
///
/// Holds no conversation state; the caller passes the history in and gets
/// the updated history back, so one loop can serve many sessions.
pub struct AgentLoop {
    /// Completion client.
    provider: Arc<dyn LlmProvider>,
    /// Tools offered to the model on every call.
    tools: Arc<ToolRegistry>,
    /// Model to use (overrides provider default if set).
    model: String,
    /// LLM request config (temperature, max_tokens).
    request_config: LlmRequestConfig,
    /// Tool-choice policy sent with every call.
    tool_choice: ToolChoice,
    /// Max completion calls per turn; `0` means unbounded.
    max_iterations: usize,
}

impl AgentLoop {
    /// Create a loop using the provider's default model and default settings.
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            tools,
            model,
            request_config: LlmRequestConfig::default(),
            tool_choice: ToolChoice::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Create a loop from the `agent` config section.
    pub fn from_config(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
    ) -> Self {
        let agent = Self::new(provider, tools)
            .with_model(&config.model)
            .with_tool_choice(config.tool_choice)
            .with_max_iterations(config.max_tool_iterations as usize)
            .with_request_config(LlmRequestConfig {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            });

        info!(
            model = %agent.model,
            tools = ?agent.tools.tool_names(),
            tool_choice = %agent.tool_choice,
            max_iterations = agent.max_iterations,
            "agent loop initialized"
        );
        agent
    }

    /// Use a specific model (aliases are resolved).
    pub fn with_model(mut self, model: &str) -> Self {
        if !model.trim().is_empty() {
            self.model = resolve_model_alias(model);
        }
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    /// Bound the completion calls per turn. `0` disables the bound.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_request_config(mut self, request_config: LlmRequestConfig) -> Self {
        self.request_config = request_config;
        self
    }

    /// Run one user turn against `conversation`.
    ///
    /// Tool failures are not errors here: they end the turn with
    /// [`TurnStatus::ToolFailed`]. Only a failed completion call or a prior
    /// history with orphaned tool results returns `Err`.
    pub async fn run_turn(
        &self,
        query: &str,
        mut conversation: Conversation,
    ) -> Result<TurnOutcome, AgentError> {
        conversation.check_threading()?;
        conversation.push(Message::user(query));

        let definitions = self.tools.get_definitions();
        let tools = (!definitions.is_empty()).then_some(definitions.as_slice());

        let mut state = LoopState::AwaitingModel;
        let mut pending: Vec<ToolCall> = Vec::new();
        let mut iterations = 0usize;
        let mut usage = UsageInfo::default();

        loop {
            match state {
                LoopState::AwaitingModel => {
                    if self.max_iterations > 0 && iterations >= self.max_iterations {
                        warn!(iterations, "iteration limit reached without a final answer");
                        conversation.push(Message::assistant(format!(
                            "Stopped after {iterations} model calls without a final answer."
                        )));
                        return Ok(TurnOutcome {
                            conversation,
                            status: TurnStatus::IterationLimit,
                            iterations,
                            usage,
                        });
                    }

                    iterations += 1;
                    debug!(iteration = iterations, messages = conversation.len(), "LLM call");

                    let response = self
                        .provider
                        .chat(
                            conversation.messages(),
                            tools,
                            self.tool_choice,
                            &self.model,
                            &self.request_config,
                        )
                        .await
                        .map_err(|e| {
                            error!(
                                provider = self.provider.display_name(),
                                transient = e.is_transient(),
                                error = %e,
                                "completion call failed"
                            );
                            e
                        })?;

                    if let Some(call_usage) = response.usage {
                        debug!(
                            prompt_tokens = call_usage.prompt_tokens,
                            completion_tokens = call_usage.completion_tokens,
                            "completion usage"
                        );
                        usage += call_usage;
                    }

                    if response.has_tool_calls() {
                        debug!(count = response.tool_calls.len(), "model requested tools");
                        pending = response.tool_calls;
                        state = LoopState::DispatchingTools;
                    } else {
                        conversation.push(Message::assistant(response.content.unwrap_or_default()));
                        state = LoopState::Done;
                    }
                }

                LoopState::DispatchingTools => {
                    state = LoopState::AwaitingModel;
                    for call in std::mem::take(&mut pending) {
                        match self.tools.dispatch(&call).await {
                            Ok(result) => {
                                let call_id = call.id.clone();
                                conversation.push(Message::assistant_tool_calls(vec![call]));
                                conversation.push(Message::tool_result(call_id, result.to_string()));
                            }
                            Err(err) => {
                                conversation.push(Message::assistant(err.user_message()));
                                state = LoopState::Failed;
                                break;
                            }
                        }
                    }
                }

                LoopState::Done => {
                    debug!(iterations, "turn finished");
                    return Ok(TurnOutcome {
                        conversation,
                        status: TurnStatus::Done,
                        iterations,
                        usage,
                    });
                }

                LoopState::Failed => {
                    return Ok(TurnOutcome {
                        conversation,
                        status: TurnStatus::ToolFailed,
                        iterations,
                        usage,
                    });
                }
            }
        }
    }

    /// Append `query` to `prior` and return the full updated history.
    pub async fn handle_user_query(
        &self,
        query: &str,
        prior: Vec<Message>,
    ) -> Result<Vec<Message>, AgentError> {
        let outcome = self.run_turn(query, Conversation::from(prior)).await?;
        Ok(outcome.conversation.into_messages())
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use neochat_core::types::{LlmResponse, Role, ToolDefinition};
    use neochat_providers::ProviderError;
    use serde_json::json;

    use crate::tools::testing::RecordingTool;
    use crate::tools::ToolName;

    /// A mock LLM provider that returns canned responses and records what
    /// it was sent.
    struct MockProvider {
        responses: Mutex<VecDeque<Result<LlmResponse, ProviderError>>>,
        seen: Mutex<Vec<Vec<Message>>>,
        tool_counts: Mutex<Vec<usize>>,
        choices: Mutex<Vec<ToolChoice>>,
    }

    impl MockProvider {
        fn new(responses: Vec<LlmResponse>) -> Self {
            Self::scripted(responses.into_iter().map(Ok).collect())
        }

        fn scripted(responses: Vec<Result<LlmResponse, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
                tool_counts: Mutex::new(Vec::new()),
                choices: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn chat(
            &self,
            messages: &[Message],
            tools: Option<&[ToolDefinition]>,
            tool_choice: ToolChoice,
            _model: &str,
            _config: &LlmRequestConfig,
        ) -> Result<LlmResponse, ProviderError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.tool_counts
                .lock()
                .unwrap()
                .push(tools.map(|t| t.len()).unwrap_or(0));
            self.choices.lock().unwrap().push(tool_choice);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(LlmResponse::text("(script exhausted)")))
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        fn display_name(&self) -> &str {
            "Mock"
        }
    }

    fn call(id: &str, name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall::new(id, name, args.to_string())
    }

    fn agent(provider: Arc<MockProvider>, tools: Vec<Arc<RecordingTool>>) -> AgentLoop {
        let registry = tools
            .into_iter()
            .fold(ToolRegistry::builder(), |b, t| b.register(t))
            .build();
        AgentLoop::new(provider, Arc::new(registry))
    }

    fn roles(messages: &[Message]) -> Vec<Role> {
        messages.iter().map(Message::role).collect()
    }

    /// Every tool message follows an assistant message announcing its id.
    fn assert_threaded(messages: &[Message]) {
        for (i, msg) in messages.iter().enumerate() {
            if let Some(id) = msg.tool_call_id() {
                assert!(i > 0, "tool result at index 0");
                let announced = messages[i - 1].tool_calls().iter().any(|c| c.id == id);
                assert!(announced, "tool result {id} at {i} not preceded by its call");
            }
        }
    }

    // ── End-to-end turns ──

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let provider = Arc::new(MockProvider::new(vec![LlmResponse::text("Paris.")]));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb));
        let agent = agent(provider.clone(), vec![search.clone()]);

        let prior = vec![Message::user("Hi"), Message::assistant("Hello!")];
        let out = agent
            .handle_user_query("What is the capital of France?", prior.clone())
            .await
            .unwrap();

        assert_eq!(out.len(), prior.len() + 2);
        assert_eq!(&out[..2], prior.as_slice());
        assert_eq!(out[2], Message::user("What is the capital of France?"));
        assert_eq!(out[3], Message::assistant("Paris."));
        assert!(out.iter().all(|m| m.role() != Role::Tool));
        assert_eq!(provider.calls(), 1);
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_search_then_answer() {
        let provider = Arc::new(MockProvider::new(vec![
            LlmResponse::with_tool_calls(vec![call("call_1", "search_web", json!({"query": "rust 2024"}))]),
            LlmResponse::text("Rust 2024 shipped in 1.85."),
        ]));
        let search = Arc::new(RecordingTool::returning(
            ToolName::SearchWeb,
            json!({"query": "rust 2024", "results": [], "success": true}),
        ));
        let agent = agent(provider.clone(), vec![search.clone()]);

        let outcome = agent.run_turn("What's new in Rust 2024?", Conversation::new()).await.unwrap();
        let msgs = outcome.conversation.messages();

        assert_eq!(outcome.status, TurnStatus::Done);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(
            roles(msgs),
            vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(msgs[1].tool_calls()[0].name(), "search_web");
        assert_eq!(msgs[1].content(), None);
        assert_eq!(msgs[2].tool_call_id(), Some("call_1"));
        let payload: serde_json::Value = serde_json::from_str(msgs[2].content().unwrap()).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(outcome.reply(), Some("Rust 2024 shipped in 1.85."));

        // The second call sees the tool result.
        let second = &provider.seen.lock().unwrap()[1];
        assert_eq!(second.len(), 3);
        assert_eq!(second[2].tool_call_id(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_unsuccessful_tool_payload_continues() {
        let provider = Arc::new(MockProvider::new(vec![
            LlmResponse::with_tool_calls(vec![call("c1", "execute_python", json!({"code": "1/0"}))]),
            LlmResponse::text("That division fails."),
        ]));
        let python = Arc::new(RecordingTool::returning(
            ToolName::ExecutePython,
            json!({"stdout": "", "stderr": "ZeroDivisionError: division by zero", "success": false}),
        ));
        let agent = agent(provider.clone(), vec![python]);

        let outcome = agent.run_turn("compute 1/0", Conversation::new()).await.unwrap();

        assert_eq!(outcome.status, TurnStatus::Done);
        assert_eq!(provider.calls(), 2);
        assert_eq!(outcome.reply(), Some("That division fails."));
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_turn() {
        let provider = Arc::new(MockProvider::new(vec![LlmResponse::with_tool_calls(vec![call(
            "c1",
            "delete_universe",
            json!({}),
        )])]));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb));
        let agent = agent(provider.clone(), vec![search.clone()]);

        let outcome = agent.run_turn("please", Conversation::new()).await.unwrap();
        let msgs = outcome.conversation.messages();

        assert_eq!(outcome.status, TurnStatus::ToolFailed);
        assert_eq!(roles(msgs), vec![Role::User, Role::Assistant]);
        assert_eq!(
            msgs[1].content(),
            Some("An error occurred while executing 'delete_universe': tool 'delete_universe' not found in the registry")
        );
        assert_eq!(provider.calls(), 1);
        assert_eq!(search.call_count(), 0);
    }

    // ── Properties ──

    #[tokio::test]
    async fn test_fail_fast_skips_rest_of_batch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let wiki = Arc::new(RecordingTool::ok(ToolName::FetchWikipediaSummary).with_log(log.clone()));
        let browse = Arc::new(RecordingTool::failing(ToolName::BrowseWeb, "connection refused").with_log(log.clone()));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb).with_log(log.clone()));

        let provider = Arc::new(MockProvider::new(vec![LlmResponse::with_tool_calls(vec![
            call("c1", "fetch_wikipedia_summary", json!({"topic": "Rust"})),
            call("c2", "browse_web", json!({"url": "https://example.com"})),
            call("c3", "search_web", json!({"query": "rust"})),
        ])]));
        let agent = agent(provider.clone(), vec![wiki, browse, search.clone()]);

        let outcome = agent.run_turn("go", Conversation::new()).await.unwrap();
        let msgs = outcome.conversation.messages();

        assert_eq!(outcome.status, TurnStatus::ToolFailed);
        assert_eq!(*log.lock().unwrap(), vec!["fetch_wikipedia_summary", "browse_web"]);
        assert_eq!(search.call_count(), 0);
        assert_eq!(
            roles(msgs),
            vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(
            msgs[3].content(),
            Some("An error occurred while executing 'browse_web': connection refused")
        );
        assert!(msgs[3].tool_calls().is_empty());
        assert_eq!(provider.calls(), 1);
        assert_threaded(msgs);
    }

    #[tokio::test]
    async fn test_malformed_arguments_fail_turn() {
        let provider = Arc::new(MockProvider::new(vec![LlmResponse::with_tool_calls(vec![
            ToolCall::new("c1", "search_web", "{not json"),
        ])]));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb));
        let agent = agent(provider, vec![search.clone()]);

        let outcome = agent.run_turn("go", Conversation::new()).await.unwrap();

        assert_eq!(outcome.status, TurnStatus::ToolFailed);
        assert!(outcome
            .reply()
            .unwrap()
            .starts_with("An error occurred while executing 'search_web': invalid arguments:"));
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_order_and_threading_preserved() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb).with_log(log.clone()));
        let wiki = Arc::new(RecordingTool::ok(ToolName::FetchWikipediaSummary).with_log(log.clone()));
        let python = Arc::new(RecordingTool::ok(ToolName::ExecutePython).with_log(log.clone()));

        // Emitted order differs from the registry's key order.
        let provider = Arc::new(MockProvider::new(vec![
            LlmResponse::with_tool_calls(vec![
                call("c1", "search_web", json!({"query": "a"})),
                call("c2", "execute_python", json!({"code": "1"})),
                call("c3", "fetch_wikipedia_summary", json!({"topic": "b"})),
            ]),
            LlmResponse::text("done"),
        ]));
        let agent = agent(provider, vec![search, wiki, python]);

        let prior = vec![Message::user("earlier"), Message::assistant("ok")];
        let outcome = agent.run_turn("go", Conversation::from(prior)).await.unwrap();
        let msgs = outcome.conversation.messages();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["search_web", "execute_python", "fetch_wikipedia_summary"]
        );
        let result_ids: Vec<_> = msgs.iter().filter_map(Message::tool_call_id).collect();
        assert_eq!(result_ids, vec!["c1", "c2", "c3"]);
        assert_threaded(msgs);
        assert!(outcome.conversation.check_threading().is_ok());
        assert_eq!(msgs.len(), 2 + 1 + 6 + 1);
    }

    #[tokio::test]
    async fn test_tools_and_choice_sent_on_every_call() {
        let provider = Arc::new(MockProvider::new(vec![
            LlmResponse::with_tool_calls(vec![call("c1", "search_web", json!({"query": "x"}))]),
            LlmResponse::text("done"),
        ]));
        let agent = agent(
            provider.clone(),
            vec![
                Arc::new(RecordingTool::ok(ToolName::SearchWeb)),
                Arc::new(RecordingTool::ok(ToolName::BrowseWeb)),
            ],
        )
        .with_tool_choice(ToolChoice::Required);

        agent.run_turn("go", Conversation::new()).await.unwrap();

        assert_eq!(*provider.tool_counts.lock().unwrap(), vec![2, 2]);
        assert_eq!(
            *provider.choices.lock().unwrap(),
            vec![ToolChoice::Required, ToolChoice::Required]
        );
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let looping = (0..5)
            .map(|i| {
                LlmResponse::with_tool_calls(vec![call(&format!("c{i}"), "search_web", json!({"query": "again"}))])
            })
            .collect();
        let provider = Arc::new(MockProvider::new(looping));
        let agent = agent(provider.clone(), vec![Arc::new(RecordingTool::ok(ToolName::SearchWeb))])
            .with_max_iterations(3);

        let outcome = agent.run_turn("loop forever", Conversation::new()).await.unwrap();

        assert_eq!(outcome.status, TurnStatus::IterationLimit);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(provider.calls(), 3);
        assert_eq!(
            outcome.reply(),
            Some("Stopped after 3 model calls without a final answer.")
        );
        assert_threaded(outcome.conversation.messages());
    }

    #[tokio::test]
    async fn test_zero_iterations_is_unbounded() {
        let mut script: Vec<LlmResponse> = (0..25)
            .map(|i| LlmResponse::with_tool_calls(vec![call(&format!("c{i}"), "search_web", json!({"query": "q"}))]))
            .collect();
        script.push(LlmResponse::text("finally"));
        let provider = Arc::new(MockProvider::new(script));
        let agent = agent(provider, vec![Arc::new(RecordingTool::ok(ToolName::SearchWeb))])
            .with_max_iterations(0);

        let outcome = agent.run_turn("go", Conversation::new()).await.unwrap();
        assert_eq!(outcome.status, TurnStatus::Done);
        assert_eq!(outcome.iterations, 26);
    }

    #[tokio::test]
    async fn test_completion_error_propagates() {
        let provider = Arc::new(MockProvider::scripted(vec![
            Ok(LlmResponse::with_tool_calls(vec![call("c1", "search_web", json!({"query": "x"}))])),
            Err(ProviderError::Api {
                provider: "Mock".into(),
                status: 500,
                body: "overloaded".into(),
            }),
        ]));
        let search = Arc::new(RecordingTool::ok(ToolName::SearchWeb));
        let agent = agent(provider, vec![search.clone()]);

        let err = agent.handle_user_query("go", Vec::new()).await.unwrap_err();

        assert!(matches!(err, AgentError::Completion(ProviderError::Api { status: 500, .. })));
        assert_eq!(search.call_count(), 1);
    }

    #[tokio::test]
    async fn test_orphaned_tool_result_rejected() {
        let provider = Arc::new(MockProvider::new(vec![LlmResponse::text("never")]));
        let agent = agent(provider.clone(), vec![]);

        let prior = vec![Message::user("hi"), Message::tool_result("ghost", "{}")];
        let err = agent.handle_user_query("go", prior).await.unwrap_err();

        assert!(matches!(err, AgentError::InvalidHistory(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_usage_accumulates_across_calls() {
        let usage = |p, c| UsageInfo {
            prompt_tokens: p,
            completion_tokens: c,
            total_tokens: p + c,
        };
        let mut first =
            LlmResponse::with_tool_calls(vec![call("c1", "search_web", json!({"query": "x"}))]);
        first.usage = Some(usage(100, 20));
        let mut second = LlmResponse::text("done");
        second.usage = Some(usage(150, 30));

        let provider = Arc::new(MockProvider::new(vec![first, second]));
        let agent = agent(provider, vec![Arc::new(RecordingTool::ok(ToolName::SearchWeb))]);

        let outcome = agent.run_turn("go", Conversation::new()).await.unwrap();
        assert_eq!(outcome.usage, usage(250, 50));
    }

    #[tokio::test]
    async fn test_empty_registry_sends_no_tools() {
        let provider = Arc::new(MockProvider::new(vec![LlmResponse::text("plain")]));
        let agent = agent(provider.clone(), vec![]);

        agent.run_turn("hi", Conversation::new()).await.unwrap();
        assert_eq!(*provider.tool_counts.lock().unwrap(), vec![0]);
    }

    #[test]
    fn test_from_config_resolves_alias() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let config = AgentConfig {
            model: "gpt-4o".into(),
            max_tool_iterations: 7,
            ..Default::default()
        };
        let agent = AgentLoop::from_config(provider, Arc::new(ToolRegistry::builder().build()), &config);
        assert_eq!(agent.model(), "openai/gpt-4o");
        assert_eq!(agent.max_iterations, 7);
    }
}
