//! # Vibefn AI
//!
//! Generation backend implementations for the vibefn synthesis engine.
//!
//! This crate provides ready-to-use backends:
//!
//! - **OpenAI**: chat-completions API, including OpenAI-compatible gateways
//!   (OpenRouter, vLLM, ...) via the base-URL override
//! - **Ollama**: local models
//!
//! ## Example
//!
//! ```rust,ignore
//! use vibefn_ai::OpenAiProvider;
//! use vibefn_core::{FnInterface, VibeEngine};
//!
//! // One-line initialization from environment
//! let provider = OpenAiProvider::from_env()?;
//!
//! let engine = VibeEngine::new(provider)?;
//! let result = engine.invoke(&interface, args).await?;
//! ```

pub mod error;
pub mod ollama;
pub mod openai;

pub use error::AiError;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Re-export core types for convenience.
pub use vibefn_core::{
    BodyProvider, FnInterface, Mode, ProviderConfig, Result, VibeConfig, VibeEngine, VibeError,
};

/// Create an OpenAI provider with a single line.
///
/// # Example
///
/// ```rust,ignore
/// let provider = vibefn_ai::openai("gpt-4.1-mini")?;
/// ```
pub fn openai(model: &str) -> Result<OpenAiProvider> {
    OpenAiProvider::from_env_with_model(model)
}

/// Create an Ollama provider with a single line.
///
/// # Example
///
/// ```rust,ignore
/// let provider = vibefn_ai::ollama("codellama");
/// ```
pub fn ollama(model: &str) -> OllamaProvider {
    OllamaProvider::new(model)
}
