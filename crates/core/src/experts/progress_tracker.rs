//! # Progress Tracker
//!
//! The one mandatory council seat. It composes the generic reviewer (same
//! fail-hard semantics) with a second, independent structured-extraction
//! call that turns the goal into a numeric progress estimate. Only the
//! numeric half is fail-soft: a reply that cannot be parsed yields the
//! documented default estimate and never an error.

use crate::experts::prompts;
use crate::experts::registry;
use crate::experts::reviewer::{ExpertReview, ExpertReviewer, ReviewRequest};
use crate::llm::{parse, TextGenerator};
use crate::models::GenerationProfile;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const EXTRACTION_SYSTEM: &str =
    "You are a progress metrics extraction assistant. Output valid JSON only.";

const DEFAULT_UNIT: &str = "tasks";
const DEFAULT_PER_DAY: f64 = 1.0;
const DEFAULT_PER_WEEK: f64 = 5.0;

/// Numeric tracking targets for one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEstimate {
    pub goal_id: String,
    pub unit: String,
    pub estimated_per_day: f64,
    pub estimated_per_week: f64,
}

impl ProgressEstimate {
    /// The documented fallback when extraction fails
    pub fn fallback(goal_id: impl Into<String>) -> Self {
        Self {
            goal_id: goal_id.into(),
            unit: DEFAULT_UNIT.to_string(),
            estimated_per_day: DEFAULT_PER_DAY,
            estimated_per_week: DEFAULT_PER_WEEK,
        }
    }
}

/// Review plus estimate, as produced for every processed goal
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub review: ExpertReview,
    pub estimate: ProgressEstimate,
}

/// The specialized mandatory reviewer
pub struct ProgressTracker {
    reviewer: ExpertReviewer,
    generator: Arc<dyn TextGenerator>,
}

impl ProgressTracker {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let reviewer = ExpertReviewer::new(
            registry::mandatory_info(),
            prompts::PROGRESS_TRACKER,
            generator.clone(),
        );
        Self {
            reviewer,
            generator,
        }
    }

    /// Run the qualitative review, then the numeric extraction.
    ///
    /// The two calls are independent: a review failure propagates, an
    /// extraction failure never does.
    pub async fn invoke(&self, request: &ReviewRequest) -> Result<ProgressReport> {
        let review = self.reviewer.invoke(request).await?;
        let estimate = self.extract_estimate(request).await;
        Ok(ProgressReport { review, estimate })
    }

    async fn extract_estimate(&self, request: &ReviewRequest) -> ProgressEstimate {
        let prompt = prompts::PROGRESS_EXTRACTION.replace("{goal_text}", &request.goal_text);

        let reply = match self
            .generator
            .generate(EXTRACTION_SYSTEM, &prompt, &GenerationProfile::extraction())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    goal_id = %request.goal_id,
                    "progress extraction call failed, using defaults: {e:#}"
                );
                return ProgressEstimate::fallback(&request.goal_id);
            }
        };

        match parse::from_reply::<Value>(&reply) {
            Ok(parsed) => ProgressEstimate {
                goal_id: request.goal_id.clone(),
                unit: parsed["unit"]
                    .as_str()
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or(DEFAULT_UNIT)
                    .to_string(),
                estimated_per_day: positive_number(&parsed["estimatedPerDay"], DEFAULT_PER_DAY),
                estimated_per_week: positive_number(&parsed["estimatedPerWeek"], DEFAULT_PER_WEEK),
            },
            Err(e) => {
                tracing::warn!(
                    goal_id = %request.goal_id,
                    "progress extraction reply was not parseable, using defaults: {e:#}"
                );
                ProgressEstimate::fallback(&request.goal_id)
            }
        }
    }
}

/// Coerce one field to a positive number, falling back field-by-field.
fn positive_number(value: &Value, default: f64) -> f64 {
    value.as_f64().filter(|n| *n > 0.0).unwrap_or(default)
}
