//! # Expert Reviewer
//!
//! One generic, role-configured reviewer behind every council seat. A role
//! is data: an [`ExpertInfo`] record plus a static system prompt. Invoking
//! a reviewer issues a single generation call and harvests an optional
//! "ACTION ITEMS" block out of the free-text reply.
//!
//! Reviewer calls are fail-hard: a qualitative review has no safe default,
//! so generation errors propagate to the caller untouched.

use crate::llm::TextGenerator;
use crate::models::GenerationProfile;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Static metadata for one council seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpertInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// The mandatory reviewer runs for every goal regardless of selection
    pub required: bool,
}

/// One goal as seen by a reviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub goal_id: String,
    pub goal_text: String,
    /// Extra framing the caller may thread through (unused by the council
    /// orchestrator today)
    #[serde(default)]
    pub additional_context: Option<String>,
}

impl ReviewRequest {
    pub fn new(goal_id: impl Into<String>, goal_text: impl Into<String>) -> Self {
        Self {
            goal_id: goal_id.into(),
            goal_text: goal_text.into(),
            additional_context: None,
        }
    }
}

/// One expert's feedback on one goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertReview {
    pub expert_id: String,
    pub expert_name: String,
    pub review_content: String,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Role-configured reviewer capability
pub struct ExpertReviewer {
    info: ExpertInfo,
    system_prompt: &'static str,
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for ExpertReviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpertReviewer")
            .field("info", &self.info)
            .field("system_prompt", &self.system_prompt)
            .finish_non_exhaustive()
    }
}

impl ExpertReviewer {
    pub fn new(
        info: ExpertInfo,
        system_prompt: &'static str,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            info,
            system_prompt,
            generator,
        }
    }

    pub fn info(&self) -> &ExpertInfo {
        &self.info
    }

    /// Review one goal. Generation failures propagate.
    pub async fn invoke(&self, request: &ReviewRequest) -> Result<ExpertReview> {
        let prompt = build_user_prompt(request);
        let content = self
            .generator
            .generate(self.system_prompt, &prompt, &GenerationProfile::expert())
            .await?;

        let action_items = extract_action_items(&content);
        Ok(ExpertReview {
            expert_id: self.info.id.to_string(),
            expert_name: self.info.name.to_string(),
            review_content: content,
            action_items,
        })
    }
}

fn build_user_prompt(request: &ReviewRequest) -> String {
    let mut prompt = format!(
        "Please review the following goal:\n\nGoal: {}",
        request.goal_text
    );
    if let Some(context) = &request.additional_context {
        prompt.push_str(&format!("\n\nAdditional Context: {}", context));
    }
    prompt
}

/// Matches an "ACTION ITEMS" heading line, with optional numbering and a
/// trailing colon, possibly followed by inline content.
fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:\d+[.)]\s*)?ACTION ITEMS:?\s*(.*)$")
            .expect("action items regex is valid")
    })
}

/// Strips leading bullet and numbering markers off one item line.
fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*\d.)\s]+").expect("marker regex is valid"))
}

/// Pull the action-items block out of a free-text review.
///
/// Mini-grammar: a case-insensitive "ACTION ITEMS" heading line opens the
/// block; subsequent non-blank lines belong to it until a blank line or the
/// next ALL-CAPS heading. Leading bullet/number markers are stripped from
/// each item. No heading means no items.
pub(crate) fn extract_action_items(content: &str) -> Vec<String> {
    let mut lines = content.lines();
    let mut items = Vec::new();

    // Scan for the heading; inline content after the colon counts as the
    // first item.
    for line in lines.by_ref() {
        if let Some(captures) = heading_re().captures(line) {
            if let Some(inline) = captures.get(1) {
                let item = marker_re().replace(inline.as_str(), "").trim().to_string();
                if !item.is_empty() {
                    items.push(item);
                }
            }
            break;
        }
    }

    for line in lines {
        if line.trim().is_empty() || is_caps_heading(line) {
            break;
        }
        let item = marker_re().replace(line, "").trim().to_string();
        if !item.is_empty() {
            items.push(item);
        }
    }

    items
}

/// A line counts as a section heading when every letter in it is uppercase
/// (ignoring numbering and punctuation) and it has at least two letters.
fn is_caps_heading(line: &str) -> bool {
    let mut count = 0;
    for c in line.trim().chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return false;
        }
        count += 1;
    }
    count >= 2
}
