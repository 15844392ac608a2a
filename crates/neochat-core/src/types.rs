//! Core types for Neochat — chat messages, tool calls, and LLM responses.
//!
//! These types model the OpenAI chat completions wire format, which every
//! supported provider speaks. Messages are a role-tagged enum so that a tool
//! result without a `tool_call_id` (or a user turn carrying tool calls) cannot
//! be constructed.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conversation::Conversation;

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// Conversation role of a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversational turn.
///
/// Each variant maps to a `role` field value on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "assistant")]
    Assistant {
        /// Absent when the turn only announces tool invocations.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },

    #[serde(rename = "tool")]
    Tool {
        content: String,
        tool_call_id: String,
    },
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message with text content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Create an assistant message announcing tool calls (no text content).
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant {
            content: None,
            tool_calls: Some(tool_calls),
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    /// Text content, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Message::User { content } | Message::Tool { content, .. } => Some(content),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls requested by an assistant turn (empty for other roles).
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Assistant {
                tool_calls: Some(calls),
                ..
            } => calls,
            _ => &[],
        }
    }

    /// Correlation id of a tool result.
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Message::Tool { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Tool Calls (function calling)
// ─────────────────────────────────────────────

/// A tool call from the assistant, requesting execution of a function.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Unique ID for this tool call (used to match results).
    pub id: String,
    /// Always "function" in current OpenAI API.
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    /// The function to call.
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    /// Create a new tool call.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        ToolCall {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// Name of the requested tool.
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// The function name and arguments within a tool call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    /// Name of the function/tool to call.
    pub name: String,
    /// JSON-encoded arguments string, exactly as the model emitted it.
    pub arguments: String,
}

// ─────────────────────────────────────────────
// Tool Definitions (for LLM requests)
// ─────────────────────────────────────────────

/// Definition of a tool, sent to the LLM so it knows what tools are available.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function schema.
    pub function: FunctionDefinition,
}

/// Schema of a function tool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// How the model may use the offered tools on a given call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Never call a tool.
    None,
    /// The model decides freely.
    #[default]
    Auto,
    /// The model must call at least one tool.
    Required,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::None => "none",
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "required",
        }
    }
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ToolChoice::None),
            "auto" => Ok(ToolChoice::Auto),
            "required" => Ok(ToolChoice::Required),
            other => Err(format!("unknown tool choice '{other}' (expected none, auto or required)")),
        }
    }
}

// ─────────────────────────────────────────────
// LLM Response
// ─────────────────────────────────────────────

/// One model response: either a final answer or a batch of tool calls.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Text content from the assistant (None if only tool calls).
    pub content: Option<String>,
    /// Tool calls requested by the assistant, in emitted order.
    pub tool_calls: Vec<ToolCall>,
    /// Why the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage statistics.
    pub usage: Option<UsageInfo>,
}

impl LlmResponse {
    /// A plain text answer.
    pub fn text(content: impl Into<String>) -> Self {
        LlmResponse {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// A response requesting the given tool calls.
    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        LlmResponse {
            tool_calls,
            ..Default::default()
        }
    }

    /// Whether the response contains tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage statistics from the LLM.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Sums saturate at `u32::MAX`.
impl std::ops::AddAssign for UsageInfo {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

// ─────────────────────────────────────────────
// Provider-related types
// ─────────────────────────────────────────────

/// Raw chat completion response from an OpenAI-compatible API.
/// Used internally for deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatCompletionResponse {
    /// Convert the first choice into an [`LlmResponse`].
    ///
    /// Returns `None` when the API sent no choices at all.
    pub fn into_response(self) -> Option<LlmResponse> {
        let usage = self.usage;
        self.choices.into_iter().next().map(|c| LlmResponse {
            content: c.message.content,
            tool_calls: c.message.tool_calls.unwrap_or_default(),
            finish_reason: c.finish_reason,
            usage,
        })
    }
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

// ─────────────────────────────────────────────
// Session types
// ─────────────────────────────────────────────

/// A persisted conversation with its timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub key: String,
    pub conversation: Conversation,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Session {
    /// Create a new empty session.
    pub fn new(key: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Session {
            key: key.into(),
            conversation: Conversation::new(),
            created_at: now,
            updated_at: now,
            metadata: HashMap::new(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
