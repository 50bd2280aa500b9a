//! # OpenAI-Compatible Client
//!
//! Production [`TextGenerator`] backed by the chat-completions endpoint.
//! Supports direct OpenAI and Azure OpenAI deployments; the provider is
//! selected through [`ModelConfig`] or the environment, following the
//! `from_env()` convention used across the council.

use crate::llm::TextGenerator;
use crate::models::{GenerationProfile, LlmProvider, ModelConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: ModelConfig,
    api_key: String,
    /// Azure routes the key through `api-key` instead of a bearer token.
    azure_api_version: Option<String>,
}

impl OpenAiClient {
    /// Build a client from explicit config and key.
    pub fn new(config: ModelConfig, api_key: impl Into<String>) -> Self {
        let azure_api_version = match config.provider {
            LlmProvider::Azure => Some(AZURE_API_VERSION.to_string()),
            LlmProvider::OpenAi => None,
        };
        Self {
            http: reqwest::Client::new(),
            config,
            api_key: api_key.into(),
            azure_api_version,
        }
    }

    /// Build a client from environment variables.
    ///
    /// `LLM_PROVIDER=azure` selects Azure OpenAI and reads
    /// `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`,
    /// `AZURE_OPENAI_DEPLOYMENT`, and optionally `AZURE_OPENAI_API_VERSION`.
    /// Otherwise direct OpenAI is used with `OPENAI_API_KEY` and an optional
    /// `OPENAI_BASE_URL` override.
    pub fn from_env() -> Result<Self> {
        match LlmProvider::from_env() {
            LlmProvider::Azure => {
                let api_key = std::env::var("AZURE_OPENAI_API_KEY")
                    .context("AZURE_OPENAI_API_KEY is not set")?;
                let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT")
                    .context("AZURE_OPENAI_ENDPOINT is not set")?;
                let deployment = std::env::var("AZURE_OPENAI_DEPLOYMENT")
                    .context("AZURE_OPENAI_DEPLOYMENT is not set")?;
                let api_version = std::env::var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|_| AZURE_API_VERSION.to_string());

                let config = ModelConfig::with_provider(LlmProvider::Azure, deployment)
                    .with_base_url(endpoint);
                let mut client = Self::new(config, api_key);
                client.azure_api_version = Some(api_version);
                Ok(client)
            }
            LlmProvider::OpenAi => {
                let api_key =
                    std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
                let mut config = ModelConfig::default();
                if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
                    config = config.with_base_url(base_url);
                }
                Ok(Self::new(config, api_key))
            }
        }
    }

    /// Resolve the chat-completions URL for the configured provider.
    fn completions_url(&self) -> String {
        match self.config.provider {
            LlmProvider::Azure => {
                let endpoint = self
                    .config
                    .base_url
                    .as_deref()
                    .unwrap_or_default()
                    .trim_end_matches('/');
                let api_version = self
                    .azure_api_version
                    .as_deref()
                    .unwrap_or(AZURE_API_VERSION);
                format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    endpoint, self.config.model, api_version
                )
            }
            LlmProvider::OpenAi => {
                let base = self
                    .config
                    .base_url
                    .as_deref()
                    .unwrap_or(OPENAI_BASE_URL)
                    .trim_end_matches('/');
                format!("{}/chat/completions", base)
            }
        }
    }

    fn request_body(&self, system: &str, prompt: &str, profile: &GenerationProfile) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        profile: &GenerationProfile,
    ) -> Result<String> {
        let url = self.completions_url();
        let body = self.request_body(system_instruction, user_prompt, profile);

        let mut request = self.http.post(&url).json(&body);
        request = match self.config.provider {
            LlmProvider::Azure => request.header("api-key", &self.api_key),
            LlmProvider::OpenAi => request.bearer_auth(&self.api_key),
        };

        let response = request
            .send()
            .await
            .with_context(|| format!("chat completion request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("chat completion returned {}: {}", status, detail);
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("chat completion reply was not valid JSON")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("chat completion reply contained no choices")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_url() {
        let client = OpenAiClient::new(ModelConfig::default(), "sk-test");
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_base_url_override() {
        let config = ModelConfig::default().with_base_url("http://localhost:8080/v1/");
        let client = OpenAiClient::new(config, "sk-test");
        assert_eq!(
            client.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_azure_url_includes_deployment() {
        let config = ModelConfig::with_provider(LlmProvider::Azure, "council-gpt4o")
            .with_base_url("https://example.openai.azure.com");
        let client = OpenAiClient::new(config, "azure-key");
        let url = client.completions_url();
        assert!(url.contains("/openai/deployments/council-gpt4o/chat/completions"));
        assert!(url.contains("api-version="));
    }

    #[test]
    fn test_request_body_carries_profile() {
        let client = OpenAiClient::new(ModelConfig::default(), "sk-test");
        let body = client.request_body("system", "prompt", &GenerationProfile::extraction());
        assert_eq!(body.temperature, 0.2);
        assert_eq!(body.max_tokens, 1024);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].content, "prompt");
    }
}
