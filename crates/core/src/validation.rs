//! # Goal Validation
//!
//! SMART-rubric check for a single goal. This stage is fully fail-soft: a
//! structurally valid result comes back for every input, whatever the
//! model replies (or whether it replies at all). A goal that cannot be
//! judged is flagged as a warning so a human looks at it.

use crate::experts::prompts;
use crate::llm::{parse, TextGenerator};
use crate::models::GenerationProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const VALIDATION_SYSTEM: &str = "You are a goal validation expert. Output valid JSON only.";

const FALLBACK_FEEDBACK: &str =
    "Goal validation encountered an error. Please review the goal manually.";
const MISSING_FEEDBACK: &str = "Unable to validate goal";

/// Rubric conformance of one goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Not yet validated; never produced by the validator itself
    Pending,
    Valid,
    Warning,
    Rejected,
}

/// Validator verdict for one goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub goal_id: String,
    pub status: ValidationStatus,
    pub feedback: String,
}

/// Fail-soft SMART validator
pub struct GoalValidator {
    generator: Arc<dyn TextGenerator>,
}

impl GoalValidator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Judge one goal against the rubric. Never fails.
    pub async fn validate(&self, goal_id: &str, goal_text: &str) -> ValidationResult {
        let prompt = prompts::VALIDATION.replace("{goal_text}", goal_text);

        let reply = match self
            .generator
            .generate(VALIDATION_SYSTEM, &prompt, &GenerationProfile::validation())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(goal_id, "validation call failed: {e:#}");
                return Self::fallback(goal_id);
            }
        };

        match parse::from_reply::<Value>(&reply) {
            Ok(parsed) => ValidationResult {
                goal_id: goal_id.to_string(),
                status: parsed["status"]
                    .as_str()
                    .and_then(parse_status)
                    .unwrap_or(ValidationStatus::Warning),
                feedback: parsed["feedback"]
                    .as_str()
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or(MISSING_FEEDBACK)
                    .to_string(),
            },
            Err(e) => {
                tracing::warn!(goal_id, "validation reply was not parseable: {e:#}");
                Self::fallback(goal_id)
            }
        }
    }

    fn fallback(goal_id: &str) -> ValidationResult {
        ValidationResult {
            goal_id: goal_id.to_string(),
            status: ValidationStatus::Warning,
            feedback: FALLBACK_FEEDBACK.to_string(),
        }
    }
}

/// Accept only the three statuses a validator may produce. Anything else,
/// "pending" included, coerces to a warning upstream.
fn parse_status(s: &str) -> Option<ValidationStatus> {
    match s {
        "valid" => Some(ValidationStatus::Valid),
        "warning" => Some(ValidationStatus::Warning),
        "rejected" => Some(ValidationStatus::Rejected),
        _ => None,
    }
}
