//! Completion client layer for Neochat.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait that all providers implement
//! - [`registry`] — static specs for the supported providers + matching logic
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`http_provider::create_provider`] — convenience builder from model name + config
//! - [`error::ProviderError`] — every way a completion call can fail

pub mod error;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use error::ProviderError;
pub use http_provider::{create_provider, HttpProvider};
pub use registry::{ProviderConfig, ProviderSpec, PROVIDERS};
pub use traits::{LlmProvider, LlmRequestConfig};
