//! Generation backend trait and configuration.
//!
//! Defines the interface that code-generation backends must implement.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Configuration for a generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Default model identifier, passed opaquely to the backend.
    pub model: String,

    /// Base URL override for the backend endpoint.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Create a new provider config with API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout_seconds: None,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Load config from environment variables.
    ///
    /// Expected variables:
    /// - `VIBEFN_API_KEY` or `OPENAI_API_KEY`
    /// - `VIBEFN_MODEL` (defaults to "gpt-4.1-mini")
    /// - `VIBEFN_ENDPOINT` (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("VIBEFN_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                crate::VibeError::Config(
                    "VIBEFN_API_KEY or OPENAI_API_KEY must be set".to_string(),
                )
            })?;

        let model = std::env::var("VIBEFN_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());

        let mut config = Self::new(api_key, model);

        if let Ok(url) = std::env::var("VIBEFN_ENDPOINT") {
            config = config.with_base_url(url);
        }

        Ok(config)
    }
}

/// Request for one body generation. Transient — built per miss-path call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier, passed through opaquely.
    pub model: String,

    /// The full natural-language instruction string.
    pub instructions: String,

    /// Sampling temperature. The engine pins this to 0.0 for reproducible
    /// completions.
    pub temperature: f32,
}

/// Response from body generation.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// The generated body text.
    pub body: String,

    /// Tokens used for the request, when the backend reports it.
    pub tokens_used: Option<u32>,
}

/// Trait that generation backends must implement.
#[async_trait]
pub trait BodyProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Generate a function body for the given request.
    ///
    /// Fails with a generation error if the backend call errors, times out,
    /// or returns no content.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Check if the provider is available and configured correctly.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl BodyProvider for Box<dyn BodyProvider> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.as_ref().generate(request).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.as_ref().health_check().await
    }
}

/// A mock provider for testing.
///
/// Returns a scripted body and counts how many generation requests it has
/// served, so tests can assert that cache hits never reach the backend.
#[derive(Debug, Default)]
pub struct MockProvider {
    body: String,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock that answers every request with `body`.
    pub fn returning(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generation requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BodyProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenerationResponse {
            body: self.body.clone(),
            tokens_used: Some(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_counts_calls() {
        let provider = MockProvider::returning("a + 1");
        assert_eq!(provider.calls(), 0);

        let request = GenerationRequest {
            model: "test-model".to_string(),
            instructions: "increment".to_string(),
            temperature: 0.0,
        };

        let response = provider.generate(request).await.unwrap();
        assert_eq!(response.body, "a + 1");
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_config_builders() {
        let config = ProviderConfig::new("key", "gpt-4.1-mini")
            .with_base_url("https://openrouter.ai/api/v1")
            .with_timeout(30);
        assert_eq!(config.base_url.as_deref(), Some("https://openrouter.ai/api/v1"));
        assert_eq!(config.timeout_seconds, Some(30));
    }
}
