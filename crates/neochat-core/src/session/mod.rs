//! Conversation persistence as JSONL files.
//!
//! # Disk format (JSONL)
//!
//! Each session is a `.jsonl` file under `~/.neochat/sessions/`.
//! - Line 1: metadata `{"_type": "metadata", "created_at": "...", "updated_at": "...", "metadata": {}}`
//! - Lines 2+: messages `{"role": "user", "content": "hello"}`

pub mod manager;

pub use manager::{SessionManager, SessionSummary};
