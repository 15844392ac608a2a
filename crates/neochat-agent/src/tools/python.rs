//! Python tool — run a snippet in a subprocess with a hard timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{info, warn};

use neochat_core::config::schema::PythonToolConfig;
use neochat_core::utils::truncate_string;

use super::base::{optional_u64, require_string, Tool, ToolArgs};
use super::name::ToolName;

/// Maximum length of each captured stream (characters).
const MAX_OUTPUT_LEN: usize = 10_000;

const TIMED_OUT: &str = "Execution timed out";

/// Executes Python source with the configured interpreter.
pub struct PythonTool {
    interpreter: String,
    default_timeout: u64,
    max_timeout: u64,
}

impl PythonTool {
    pub fn new(config: &PythonToolConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            default_timeout: config.timeout.max(1),
            max_timeout: config.max_timeout.max(1),
        }
    }

    fn timeout_for(&self, requested: Option<u64>) -> Duration {
        let secs = requested
            .unwrap_or(self.default_timeout)
            .clamp(1, self.max_timeout);
        Duration::from_secs(secs)
    }
}

/// Bare expressions print nothing, so source without a `print(` call is
/// wrapped in one.
fn prepare_source(code: &str) -> String {
    if code.contains("print(") {
        code.to_string()
    } else {
        format!("print({})", code.trim())
    }
}

fn outcome(stdout: &str, stderr: &str, success: bool) -> Value {
    json!({
        "stdout": truncate_string(stdout, MAX_OUTPUT_LEN),
        "stderr": truncate_string(stderr, MAX_OUTPUT_LEN),
        "success": success,
    })
}

#[async_trait]
impl Tool for PythonTool {
    fn name(&self) -> ToolName {
        ToolName::ExecutePython
    }

    fn description(&self) -> &str {
        "Execute Python code and return its output."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The Python code to execute."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Maximum execution time in seconds.",
                    "minimum": 1
                }
            },
            "required": ["code"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let code = require_string(&args, "code")?;
        let timeout = self.timeout_for(optional_u64(&args, "timeout"));
        let source = prepare_source(&code);

        info!(
            interpreter = %self.interpreter,
            timeout_secs = timeout.as_secs(),
            "executing python"
        );

        let child = Command::new(&self.interpreter)
            .arg("-c")
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!(interpreter = %self.interpreter, error = %e, "failed to spawn interpreter");
                return Ok(outcome("", &e.to_string(), false));
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                Ok(outcome(&stdout, &stderr, output.status.success()))
            }
            Ok(Err(e)) => Ok(outcome("", &e.to_string(), false)),
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "python execution timed out");
                Ok(outcome("", TIMED_OUT, false))
            }
        }
    }
}
