//! Neochat Agent — orchestration loop, tool dispatch, and built-in tools.
//!
//! This crate contains:
//! - **tools**: Tool trait, schema validation, registry, dispatcher, and the
//!   five built-in tools (wikipedia, python, browse, search, pdf)
//! - **agent_loop**: The LLM ↔ tool-calling state machine
//! - **error**: `ToolError` and `AgentError`

pub mod agent_loop;
pub mod error;
pub mod tools;

pub use agent_loop::{AgentLoop, LoopState, TurnOutcome, TurnStatus, DEFAULT_MAX_ITERATIONS};
pub use error::{AgentError, ToolError};
pub use tools::{Tool, ToolName, ToolRegistry};
