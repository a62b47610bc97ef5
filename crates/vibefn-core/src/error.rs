//! Error types for Vibefn Core.

use thiserror::Error;

/// Result type alias for Vibefn operations.
pub type Result<T> = std::result::Result<T, VibeError>;

/// Main error type for the Vibefn framework.
#[derive(Debug, Error)]
pub enum VibeError {
    /// The generation backend could not be reached or returned unusable content.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The generated or cached body text does not form a valid script body.
    #[error("Compile error: {0}")]
    Compile(String),

    /// The compiled body raised during invocation.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Filesystem operation on the artifact store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
