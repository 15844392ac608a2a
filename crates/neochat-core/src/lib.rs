//! Neochat Core — shared types for the tool-calling chat agent.
//!
//! - **types**: chat messages, tool calls, tool definitions, LLM responses
//! - **conversation**: the append-only message store for one session
//! - **config**: `~/.neochat/config.json` schema and loader
//! - **session**: JSONL persistence of conversations (caller-owned)

pub mod config;
pub mod conversation;
pub mod session;
pub mod types;
pub mod utils;

pub use conversation::{Conversation, ThreadingError};
pub use types::{LlmResponse, Message, ToolCall, ToolChoice, ToolDefinition, UsageInfo};
