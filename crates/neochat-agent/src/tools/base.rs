//! Tool trait — the abstract interface every built-in tool implements.

use async_trait::async_trait;
use serde_json::{Map, Value};

use neochat_core::types::ToolDefinition;

use super::name::ToolName;

/// Arguments of one call, already parsed and checked against the schema.
pub type ToolArgs = Map<String, Value>;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every tool implements this trait.
///
/// The registry sends schemas to the LLM via `to_definition()`, and the
/// dispatcher invokes `execute()` once the arguments passed validation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identifier used by the LLM to call this tool.
    fn name(&self) -> ToolName;

    /// Human-readable description shown to the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters (as a `serde_json::Value`).
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Execute the tool with validated arguments.
    ///
    /// Expected failures (timeouts, HTTP errors, non-zero exits) are reported
    /// inside the returned payload. An `Err` is reserved for failures the tool
    /// cannot describe, and the dispatcher turns it into a failed turn.
    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value>;

    /// Build the `ToolDefinition` sent to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name().as_str(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param, returning a user-friendly error.
pub fn require_string(args: &ToolArgs, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract an optional non-negative integer param. Integral floats such as
/// `5.0` count as integers.
pub fn optional_u64(args: &ToolArgs, key: &str) -> Option<u64> {
    let value = args.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
