//! Error types for tool dispatch and the agent loop.

use neochat_core::ThreadingError;
use neochat_providers::ProviderError;
use thiserror::Error;

use crate::tools::ToolName;

/// Why a single tool invocation could not produce a result.
///
/// Any of these ends the current turn.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{name}' not found in the registry")]
    UnknownTool { name: String },

    #[error("invalid arguments: {reason}")]
    MalformedArguments { tool: ToolName, reason: String },

    #[error("{message}")]
    Execution { tool: ToolName, message: String },
}

impl ToolError {
    /// Name of the tool the model asked for.
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::UnknownTool { name } => name,
            ToolError::MalformedArguments { tool, .. } | ToolError::Execution { tool, .. } => {
                tool.as_str()
            }
        }
    }

    /// The assistant-visible text that closes a failed turn.
    pub fn user_message(&self) -> String {
        format!(
            "An error occurred while executing '{}': {}",
            self.tool_name(),
            self
        )
    }
}

/// Errors that abort a turn without producing a conversation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("completion call failed: {0}")]
    Completion(#[from] ProviderError),

    #[error("prior conversation is not well threaded: {0}")]
    InvalidHistory(#[from] ThreadingError),
}
