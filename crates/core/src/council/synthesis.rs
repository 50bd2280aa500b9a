//! # Synthesis
//!
//! Merges one goal's collected expert reviews into a single narrative
//! summary with one generation call. The reply is returned verbatim; there
//! is no structured parsing and no fallback narrative, so errors here
//! propagate and abort the run.

use crate::experts::prompts;
use crate::experts::reviewer::ExpertReview;
use crate::llm::TextGenerator;
use crate::models::GenerationProfile;
use anyhow::Result;
use std::sync::Arc;

/// Fail-hard summary stage
pub struct SynthesisStage {
    generator: Arc<dyn TextGenerator>,
}

impl SynthesisStage {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Produce the combined summary for one goal.
    pub async fn synthesize(&self, goal_text: &str, reviews: &[ExpertReview]) -> Result<String> {
        let prompt = prompts::SYNTHESIS_TASK
            .replace("{goal_text}", goal_text)
            .replace("{expert_reviews}", &format_reviews(reviews));

        self.generator
            .generate(prompts::SYNTHESIS, &prompt, &GenerationProfile::synthesis())
            .await
    }
}

/// Render each review as a labeled section.
fn format_reviews(reviews: &[ExpertReview]) -> String {
    reviews
        .iter()
        .map(|review| format!("### {}\n{}", review.expert_name, review.review_content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
