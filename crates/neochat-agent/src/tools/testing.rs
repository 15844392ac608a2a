//! Scripted tools for dispatcher and loop tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{Tool, ToolArgs};
use super::name::ToolName;

/// A tool that records every invocation and answers from a script.
pub struct RecordingTool {
    name: ToolName,
    outcome: Result<Value, String>,
    pub calls: Arc<Mutex<Vec<ToolArgs>>>,
    log: Option<Arc<Mutex<Vec<String>>>>,
    parameters: Option<Value>,
}

impl RecordingTool {
    pub fn ok(name: ToolName) -> Self {
        Self::returning(name, json!({ "tool": name.as_str(), "success": true }))
    }

    pub fn returning(name: ToolName, value: Value) -> Self {
        Self {
            name,
            outcome: Ok(value),
            calls: Arc::new(Mutex::new(Vec::new())),
            log: None,
            parameters: None,
        }
    }

    pub fn failing(name: ToolName, message: &str) -> Self {
        Self {
            name,
            outcome: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
            log: None,
            parameters: None,
        }
    }

    /// Append this tool's name to a shared log on every call.
    pub fn with_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.log = Some(log);
        self
    }

    /// Declare a custom parameter schema instead of the permissive default.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> ToolName {
        self.name
    }

    fn description(&self) -> &str {
        "Scripted test tool"
    }

    fn parameters(&self) -> Value {
        if let Some(parameters) = &self.parameters {
            return parameters.clone();
        }
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "code": { "type": "string" },
                "url": { "type": "string" },
                "topic": { "type": "string" },
                "timeout": { "type": "integer", "minimum": 1 }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push(args);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.to_string());
        }
        match &self.outcome {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
