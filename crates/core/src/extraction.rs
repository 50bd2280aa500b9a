//! # Activity Extraction
//!
//! Turns a free-text daily update into zero or more structured activity
//! records, optionally linked to the caller's goals. One structured
//! extraction call, fully fail-soft: whatever the model replies (or
//! whether the call succeeds at all), the caller gets a well-formed list,
//! possibly empty.

use crate::experts::prompts;
use crate::llm::{parse, TextGenerator};
use crate::models::GenerationProfile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const EXTRACTION_SYSTEM: &str =
    "You are an activity extraction assistant. Output valid JSON only.";

/// Which part of the day an update covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePeriod {
    Morning,
    Afternoon,
    Evening,
    FullDay,
}

impl UpdatePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatePeriod::Morning => "morning",
            UpdatePeriod::Afternoon => "afternoon",
            UpdatePeriod::Evening => "evening",
            UpdatePeriod::FullDay => "full_day",
        }
    }
}

/// The closed set of trackable activity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Experiments,
    ProductDemos,
    Mentoring,
    Presentations,
    Volunteering,
}

impl ActivityType {
    /// Parse a model-supplied type string. Unknown values are dropped by
    /// the extractor rather than failing the batch.
    fn parse(s: &str) -> Option<Self> {
        match s {
            "experiments" => Some(ActivityType::Experiments),
            "product_demos" => Some(ActivityType::ProductDemos),
            "mentoring" => Some(ActivityType::Mentoring),
            "presentations" => Some(ActivityType::Presentations),
            "volunteering" => Some(ActivityType::Volunteering),
            _ => None,
        }
    }
}

/// One structured, quantified unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedActivity {
    pub activity_type: ActivityType,
    pub quantity: f64,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_goal_id: Option<String>,
}

/// A goal the update may reference, for grounding links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRef {
    pub id: String,
    pub goal_text: String,
}

/// One free-text daily update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUpdateInput {
    pub update_id: String,
    pub user_id: String,
    pub update_text: String,
    pub update_period: UpdatePeriod,
    pub period_date: NaiveDate,
}

/// Extraction result for one update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityExtraction {
    pub update_id: String,
    pub activities: Vec<ExtractedActivity>,
}

/// Fail-soft structured-extraction pipeline
pub struct ActivityExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl ActivityExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Extract activities from one update. Never fails; an unusable reply
    /// produces an empty list.
    pub async fn extract(
        &self,
        input: &DailyUpdateInput,
        goals: &[GoalRef],
    ) -> ActivityExtraction {
        let goal_lines = goals
            .iter()
            .map(|goal| format!("- {}: {}", goal.id, goal.goal_text))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = prompts::ACTIVITY_EXTRACTION
            .replace("{update_text}", &input.update_text)
            .replace("{update_period}", input.update_period.as_str())
            .replace(
                "{period_date}",
                &input.period_date.format("%Y-%m-%d").to_string(),
            )
            .replace("{goals}", &goal_lines);

        let reply = match self
            .generator
            .generate(EXTRACTION_SYSTEM, &prompt, &GenerationProfile::extraction())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(update_id = %input.update_id, "extraction call failed: {e:#}");
                return self.empty(input);
            }
        };

        let parsed: Value = match parse::from_reply(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    update_id = %input.update_id,
                    "extraction reply was not parseable: {e:#}"
                );
                return self.empty(input);
            }
        };

        let activities = parsed["activities"]
            .as_array()
            .map(|items| items.iter().filter_map(coerce_activity).collect())
            .unwrap_or_default();

        ActivityExtraction {
            update_id: input.update_id.clone(),
            activities,
        }
    }

    fn empty(&self, input: &DailyUpdateInput) -> ActivityExtraction {
        ActivityExtraction {
            update_id: input.update_id.clone(),
            activities: Vec::new(),
        }
    }
}

/// Coerce one raw item into an activity record. Items with an unknown type
/// are dropped; every other field degrades to a documented default.
fn coerce_activity(item: &Value) -> Option<ExtractedActivity> {
    let activity_type = item["activityType"].as_str().and_then(ActivityType::parse)?;

    Some(ExtractedActivity {
        activity_type,
        quantity: coerce_quantity(&item["quantity"]),
        summary: item["summary"].as_str().unwrap_or_default().to_string(),
        linked_goal_id: item["linkedGoalId"]
            .as_str()
            .filter(|id| !id.trim().is_empty())
            .map(|id| id.to_string()),
    })
}

/// Quantity must be a number of at least 1; anything else becomes 1.
/// Numeric strings ("3") count as numbers.
fn coerce_quantity(value: &Value) -> f64 {
    let number = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()));
    match number {
        Some(n) if n >= 1.0 => n,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{FnGenerator, ScriptedGenerator};

    fn update() -> DailyUpdateInput {
        DailyUpdateInput {
            update_id: "update-1".to_string(),
            user_id: "user-1".to_string(),
            update_text: "Ran 3 experiments and did 2 demos today.".to_string(),
            update_period: UpdatePeriod::FullDay,
            period_date: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        }
    }

    fn goals() -> Vec<GoalRef> {
        vec![
            GoalRef {
                id: "goal-1".to_string(),
                goal_text: "Conduct 50 experiments this quarter".to_string(),
            },
            GoalRef {
                id: "goal-2".to_string(),
                goal_text: "Complete 20 product demos".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_extracts_activities_from_fenced_json() {
        let reply = r#"```json
{
  "activities": [
    {"activityType": "experiments", "quantity": 3, "summary": "Checkout flow tests", "linkedGoalId": "goal-1"},
    {"activityType": "product_demos", "quantity": 2, "summary": "Sales team demos", "linkedGoalId": null}
  ]
}
```"#;
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::new([reply])));

        let result = extractor.extract(&update(), &goals()).await;

        assert_eq!(result.update_id, "update-1");
        assert_eq!(result.activities.len(), 2);
        assert_eq!(result.activities[0].activity_type, ActivityType::Experiments);
        assert_eq!(result.activities[0].quantity, 3.0);
        assert_eq!(result.activities[0].linked_goal_id.as_deref(), Some("goal-1"));
        assert_eq!(result.activities[1].linked_goal_id, None);
    }

    #[tokio::test]
    async fn test_non_json_reply_returns_empty_list() {
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::new([
            "Nothing structured about today, sorry.",
        ])));

        let result = extractor.extract(&update(), &goals()).await;
        assert!(result.activities.is_empty());
    }

    #[tokio::test]
    async fn test_call_failure_returns_empty_list() {
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::with_results(vec![
            Err(anyhow::anyhow!("quota exceeded")),
        ])));

        let result = extractor.extract(&update(), &goals()).await;
        assert!(result.activities.is_empty());
    }

    #[tokio::test]
    async fn test_quantity_coercion() {
        let reply = r#"{"activities": [
            {"activityType": "mentoring", "summary": "1:1 with mentee"},
            {"activityType": "mentoring", "quantity": "4", "summary": "group session"},
            {"activityType": "mentoring", "quantity": "several", "summary": "hallway chats"},
            {"activityType": "mentoring", "quantity": 0, "summary": "cancelled"}
        ]}"#;
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::new([reply])));

        let result = extractor.extract(&update(), &[]).await;
        let quantities: Vec<f64> = result.activities.iter().map(|a| a.quantity).collect();
        assert_eq!(quantities, vec![1.0, 4.0, 1.0, 1.0]);
    }

    #[tokio::test]
    async fn test_unknown_activity_type_is_dropped_not_fatal() {
        let reply = r#"{"activities": [
            {"activityType": "interpretive_dance", "quantity": 1, "summary": "?"},
            {"activityType": "presentations", "quantity": 1, "summary": "team talk"}
        ]}"#;
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::new([reply])));

        let result = extractor.extract(&update(), &[]).await;
        assert_eq!(result.activities.len(), 1);
        assert_eq!(
            result.activities[0].activity_type,
            ActivityType::Presentations
        );
    }

    #[tokio::test]
    async fn test_empty_linked_goal_id_becomes_none() {
        let reply = r#"{"activities": [
            {"activityType": "volunteering", "quantity": 1, "summary": "ERG event", "linkedGoalId": ""}
        ]}"#;
        let extractor = ActivityExtractor::new(Arc::new(ScriptedGenerator::new([reply])));

        let result = extractor.extract(&update(), &[]).await;
        assert_eq!(result.activities[0].linked_goal_id, None);
    }

    #[tokio::test]
    async fn test_missing_activities_key_means_empty() {
        let extractor =
            ActivityExtractor::new(Arc::new(ScriptedGenerator::new([r#"{"note": "quiet day"}"#])));

        let result = extractor.extract(&update(), &[]).await;
        assert!(result.activities.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_grounds_goals_period_and_date() {
        let generator = Arc::new(FnGenerator::new(|system: &str, prompt: &str| {
            assert!(system.contains("activity extraction assistant"));
            assert!(prompt.contains("- goal-1: Conduct 50 experiments this quarter"));
            assert!(prompt.contains("Update Period: full_day"));
            assert!(prompt.contains("Date: 2025-03-14"));
            Ok(r#"{"activities": []}"#.to_string())
        }));
        let extractor = ActivityExtractor::new(generator);
        extractor.extract(&update(), &goals()).await;
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_outputs() {
        let reply = r#"{"activities": [
            {"activityType": "experiments", "quantity": 3, "summary": "Checkout tests", "linkedGoalId": "goal-1"}
        ]}"#;
        let generator: Arc<dyn TextGenerator> =
            Arc::new(FnGenerator::new(move |_: &str, _: &str| Ok(reply.to_string())));
        let extractor = ActivityExtractor::new(generator);

        let first = extractor.extract(&update(), &goals()).await;
        let second = extractor.extract(&update(), &goals()).await;

        let first_json = serde_json::to_string(&first.activities).unwrap();
        let second_json = serde_json::to_string(&second.activities).unwrap();
        assert_eq!(first_json, second_json);
    }
}
