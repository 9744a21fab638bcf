//! Error types.
//!
//! `ProviderError` covers everything that can go wrong while talking to the
//! remote model API. `ServiceError` is the service-wide taxonomy the server
//! and binary classify failures with.

use thiserror::Error;

/// Errors that can occur when interacting with the remote model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The API answered with a body we could not make sense of.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The audio file to transcribe could not be read.
    #[error("failed to read audio file {path}: {source}")]
    AudioFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProviderError {
    /// Returns `true` if the remote side rejected the request outright.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::AuthenticationFailed(_)
                | ProviderError::ModelNotFound(_)
                | ProviderError::ApiError { .. }
        )
    }
}

/// Service-level error kinds.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote model call failed.
    #[error(transparent)]
    Transport(#[from] ProviderError),

    /// Writing a session record failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Local filesystem failure (e.g. staging an upload).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
