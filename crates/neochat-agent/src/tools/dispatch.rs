//! Tool Dispatcher — turns one model-emitted tool call into a result.
//!
//! Resolution, argument parsing, schema validation and execution all fail
//! into a [`ToolError`]; nothing a tool does escapes as a panic or a raw
//! error type.

use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use neochat_core::types::ToolCall;

use super::base::ToolArgs;
use super::name::ToolName;
use super::registry::ToolRegistry;
use crate::error::ToolError;

impl ToolRegistry {
    /// Resolve, validate and run one tool call.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let Some((tool, validator)) = self.resolve(call.name()) else {
            warn!(tool = call.name(), call_id = %call.id, "unknown tool requested");
            return Err(ToolError::UnknownTool {
                name: call.name().to_string(),
            });
        };
        let name = tool.name();

        let args = parse_arguments(name, &call.function.arguments)?;
        validator.validate(&args).map_err(|reason| {
            warn!(tool = %name, call_id = %call.id, reason = %reason, "rejected tool arguments");
            ToolError::MalformedArguments { tool: name, reason }
        })?;

        info!(
            tool = %name,
            call_id = %call.id,
            arguments = %call.function.arguments,
            "executing tool call"
        );
        let started = Instant::now();

        match tool.execute(args).await {
            Ok(value) => {
                info!(
                    tool = %name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool call finished"
                );
                Ok(value)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "tool execution failed");
                Err(ToolError::Execution {
                    tool: name,
                    message: format!("{e:#}"),
                })
            }
        }
    }
}

/// Parse the raw argument text. An empty payload means "no arguments".
fn parse_arguments(tool: ToolName, raw: &str) -> Result<ToolArgs, ToolError> {
    if raw.trim().is_empty() {
        return Ok(ToolArgs::new());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ToolError::MalformedArguments {
            tool,
            reason: format!("arguments must be a JSON object, got {other}"),
        }),
        Err(e) => Err(ToolError::MalformedArguments {
            tool,
            reason: format!("arguments are not valid JSON: {e}"),
        }),
    }
}
