//! OpenAI provider implementation.
//!
//! Works against the chat-completions API and any OpenAI-compatible gateway
//! (OpenRouter, vLLM, ...) through the base-URL override.

use crate::AiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vibefn_core::{
    provider::{GenerationRequest, GenerationResponse},
    BodyProvider, ProviderConfig, Result, VibeError,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider for body generation.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

/// OpenAI chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// Chat message.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.unwrap_or(60);
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .map_err(|e| VibeError::Generation(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `VIBEFN_API_KEY`/`OPENAI_API_KEY` and optionally `VIBEFN_MODEL`
    /// and `VIBEFN_ENDPOINT`.
    pub fn from_env() -> Result<Self> {
        let config = ProviderConfig::from_env()?;
        Self::new(config)
    }

    /// Create a provider from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        let config = ProviderConfig::from_env()?.with_model(model);
        Self::new(config)
    }
}

#[async_trait]
impl BodyProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        debug!("requesting completion from OpenAI");

        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model
        };

        let api_request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.instructions,
            }],
            temperature: request.temperature,
        };

        let url = self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(AiError::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, message }.into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let body = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or(AiError::EmptyCompletion)?;

        // Strip markdown code blocks if present
        let body = strip_code_blocks(&body);

        Ok(GenerationResponse {
            body,
            tokens_used: chat_response.usage.map(|u| u.total_tokens),
        })
    }
}

/// Strip markdown code blocks from generated code.
fn strip_code_blocks(code: &str) -> String {
    let code = code.trim();

    // Check for ```language\n...\n``` pattern
    if code.starts_with("```") && code.ends_with("```") {
        let lines: Vec<&str> = code.lines().collect();
        if lines.len() >= 2 {
            return lines[1..lines.len() - 1].join("\n");
        }
    }

    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gpt-4.1-mini".to_string(),
            instructions: "Write ONLY the function body ...".to_string(),
            temperature: 0.0,
        }
    }

    async fn provider_for(server: &MockServer) -> OpenAiProvider {
        let config = ProviderConfig::new("test-key", "gpt-4.1-mini")
            .with_base_url(format!("{}/v1/chat/completions", server.uri()));
        OpenAiProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_completion_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4.1-mini",
                "temperature": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "a.sort();\nprint(a);\na"}}
                ],
                "usage": {"total_tokens": 21}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let response = provider.generate(request()).await.unwrap();

        assert_eq!(response.body, "a.sort();\nprint(a);\na");
        assert_eq!(response.tokens_used, Some(21));
    }

    #[tokio::test]
    async fn test_api_error_is_a_generation_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.generate(request()).await.unwrap_err();
        assert!(matches!(err, VibeError::Generation(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_a_generation_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.generate(request()).await.unwrap_err();
        assert!(matches!(err, VibeError::Generation(_)));
    }

    #[test]
    fn test_strip_code_blocks() {
        let input = "```rhai\na.sort();\na\n```";
        assert_eq!(strip_code_blocks(input), "a.sort();\na");

        let input = "a + b";
        assert_eq!(strip_code_blocks(input), "a + b");
    }
}
