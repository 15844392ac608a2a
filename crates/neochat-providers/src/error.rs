//! Completion client errors.
//!
//! Every failure to obtain a usable completion maps to one of these. The
//! agent loop treats all of them as fatal for the current turn.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no configured provider for model '{model}'; set an API key such as OPENAI_API_KEY or OPENROUTER_API_KEY")]
    NotConfigured { model: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {provider} failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("{provider} returned no choices")]
    EmptyResponse { provider: String },
}

impl ProviderError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http { source, .. } => source.is_timeout() || source.is_connect(),
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
