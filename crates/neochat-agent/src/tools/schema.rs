//! Argument validation against a tool's declared JSON schema.
//!
//! Each schema is compiled once when the tool is registered; dispatch only
//! runs the compiled validator.

use jsonschema::Validator;
use serde_json::Value;

use super::base::ToolArgs;

/// A tool's parameter schema, compiled for repeated validation.
pub struct ArgumentValidator {
    validator: Validator,
}

impl ArgumentValidator {
    /// Compile `schema`. Fails when the schema itself is malformed.
    pub fn compile(schema: &Value) -> Result<Self, String> {
        jsonschema::validator_for(schema)
            .map(|validator| Self { validator })
            .map_err(|e| format!("invalid JSON schema: {e}"))
    }

    /// Check `args`. The error joins every violation into one reason the
    /// model can read.
    pub fn validate(&self, args: &ToolArgs) -> Result<(), String> {
        let instance = Value::Object(args.clone());
        let errors: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}
