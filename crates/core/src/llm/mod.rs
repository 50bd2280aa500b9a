//! # Text Generation
//!
//! The council's only external dependency is a text-generation capability.
//! Everything that talks to a model goes through the [`TextGenerator`]
//! trait so orchestration code can be exercised against deterministic
//! stand-ins. The production implementation is [`OpenAiClient`], which
//! speaks the OpenAI chat-completions wire format (direct or Azure).
//!
//! Timeouts, retries, and rate limits are deliberately not implemented
//! here; those policies belong to the calling layer.

pub mod openai;
pub mod parse;

pub use openai::OpenAiClient;

use crate::models::GenerationProfile;
use async_trait::async_trait;

/// A capability that turns one (system instruction, user prompt) pair into
/// raw reply text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one generation call and return the model's reply verbatim.
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        profile: &GenerationProfile,
    ) -> anyhow::Result<String>;
}
