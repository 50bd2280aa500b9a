//! # Council Models
//!
//! Centralized LLM configuration types for the Expert Council system.
//! These types provide a clean dependency for both the expert reviewers
//! and the council orchestration layer.

use serde::{Deserialize, Serialize};

/// Supported LLM providers
///
/// Both speak the OpenAI chat-completions wire format:
/// - OpenAI (direct) - `OPENAI_API_KEY`
/// - Azure OpenAI (enterprise deployments) - `AZURE_OPENAI_API_KEY`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

impl LlmProvider {
    /// Get all available providers
    pub fn all() -> Vec<LlmProvider> {
        vec![LlmProvider::OpenAi, LlmProvider::Azure]
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OpenAI",
            LlmProvider::Azure => "Azure OpenAI",
        }
    }

    /// Read the provider selection from `LLM_PROVIDER`
    pub fn from_env() -> Self {
        match std::env::var("LLM_PROVIDER").as_deref() {
            Ok(v) if v.eq_ignore_ascii_case("azure") => LlmProvider::Azure,
            _ => LlmProvider::OpenAi,
        }
    }
}

/// Configuration for LLM model selection
///
/// Used throughout the council to configure which provider and model backs
/// the text-generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// LLM provider to use
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g., "gpt-4o")
    pub model: String,
    /// Optional base URL override for OpenAI-compatible endpoints
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o".to_string(),
            base_url: None,
        }
    }
}

impl ModelConfig {
    /// Create a new model config with the default provider
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: model.into(),
            base_url: None,
        }
    }

    /// Create config for a specific provider
    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
        }
    }

    /// Set base URL (for OpenAI-compatible endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

/// Sampling profile for one generation call.
///
/// Deterministic stages (validation, structured extraction) run cool;
/// qualitative stages (expert reviews, synthesis) run warmer with a larger
/// token budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationProfile {
    /// Expert reviewers - balanced creativity and consistency
    pub fn expert() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Synthesis - warmer, with a larger budget for the merged narrative
    pub fn synthesis() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 4096,
        }
    }

    /// Rubric validation - more deterministic
    pub fn validation() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1024,
        }
    }

    /// Structured extraction - most deterministic
    pub fn extraction() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self::expert()
    }
}
