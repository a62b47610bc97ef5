//! AI-specific error types.

use thiserror::Error;

/// Errors specific to generation backends.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response parsing failed.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The backend returned no completion content.
    #[error("Backend returned no completion content")]
    EmptyCompletion,
}

impl From<AiError> for vibefn_core::VibeError {
    fn from(e: AiError) -> Self {
        vibefn_core::VibeError::Generation(e.to_string())
    }
}
