//! # Council Coordinator
//!
//! Orchestrates one goal-set review from raw input to the assembled
//! report: validate every goal, then for each goal in input order convene
//! the expert panel and synthesize its reviews, and finally assemble the
//! per-goal outputs plus the batch-level feedback line.
//!
//! Validation is fail-soft and always completes. Panels and synthesis are
//! fail-hard: the first error aborts the run with no partial output, and
//! the error reaches the caller unchanged. Goals are processed strictly
//! sequentially; concurrency exists only inside one goal's panel.

use crate::council::events::{CouncilEvent, CouncilEventKind};
use crate::council::panel::{ExpertPanelRunner, PanelFailureMode, PanelOutcome};
use crate::council::pipeline::{ReviewPipeline, ReviewStage};
use crate::council::synthesis::SynthesisStage;
use crate::experts::progress_tracker::ProgressEstimate;
use crate::experts::reviewer::{ExpertReview, ReviewRequest};
use crate::llm::TextGenerator;
use crate::validation::{GoalValidator, ValidationResult, ValidationStatus};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One goal as submitted for review
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub goal_id: String,
    pub goal_text: String,
    /// Position within the set (1..=5)
    pub goal_order: u8,
    /// Optional experts to convene; the Progress Tracker runs regardless
    #[serde(default)]
    pub selected_experts: Vec<String>,
}

/// A batch of goals submitted together for one review pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSetReviewInput {
    pub goal_set_id: String,
    pub user_id: String,
    pub goals: Vec<GoalInput>,
}

/// Complete review result for a single goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalReviewOutput {
    pub goal_id: String,
    pub validation_status: ValidationStatus,
    pub validation_feedback: String,
    pub expert_summary: String,
    pub expert_reviews: Vec<ExpertReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_estimate: Option<ProgressEstimate>,
}

/// Complete review result for a goal set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSetReviewOutput {
    pub goal_set_id: String,
    /// Same order as the input goals
    pub goals: Vec<GoalReviewOutput>,
    pub overall_feedback: String,
}

/// Policy knobs for a coordinator
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// What one failing optional expert does to the run
    #[serde(default)]
    pub panel_failure_mode: PanelFailureMode,
}

/// The council coordinator
pub struct CouncilCoordinator {
    validator: GoalValidator,
    panel: ExpertPanelRunner,
    synthesis: SynthesisStage,
    events: Vec<CouncilEvent>,
    event_tx: Option<mpsc::Sender<CouncilEvent>>,
}

impl CouncilCoordinator {
    /// Create a coordinator with default policy
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_config(generator, CouncilConfig::default())
    }

    /// Create a coordinator with explicit policy
    pub fn with_config(generator: Arc<dyn TextGenerator>, config: CouncilConfig) -> Self {
        Self {
            validator: GoalValidator::new(generator.clone()),
            panel: ExpertPanelRunner::new(generator.clone())
                .with_failure_mode(config.panel_failure_mode),
            synthesis: SynthesisStage::new(generator),
            events: Vec::new(),
            event_tx: None,
        }
    }

    /// Set event channel for streaming progress
    pub fn with_event_channel(mut self, tx: mpsc::Sender<CouncilEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Events recorded during the most recent run
    pub fn events(&self) -> &[CouncilEvent] {
        &self.events
    }

    /// Emit an event
    async fn emit(&mut self, event: CouncilEvent) {
        self.events.push(event.clone());
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Review a full goal set.
    #[tracing::instrument(
        skip(self, input),
        fields(goal_set_id = %input.goal_set_id, goals = input.goals.len())
    )]
    pub async fn review_goal_set(
        &mut self,
        input: &GoalSetReviewInput,
    ) -> Result<GoalSetReviewOutput> {
        self.events.clear();
        self.emit(CouncilEvent::new(
            CouncilEventKind::ReviewStarted,
            "coordinator",
        ))
        .await;

        let mut pipeline = ReviewPipeline::new(input.goals.len());

        // Stage 1: validate every goal, sequentially, in input order. The
        // validator is fail-soft so this stage always completes.
        let mut validations: HashMap<String, ValidationResult> = HashMap::new();
        for goal in &input.goals {
            let result = self.validator.validate(&goal.goal_id, &goal.goal_text).await;
            self.emit(
                CouncilEvent::new(CouncilEventKind::GoalValidated, "validator")
                    .with_goal(&goal.goal_id)
                    .with_data(serde_json::json!({ "status": result.status })),
            )
            .await;
            validations.insert(goal.goal_id.clone(), result);
        }
        pipeline.advance();

        // Stage 2: panel then synthesis per goal, strictly one goal at a
        // time. Either step failing aborts the run with no partial output.
        let mut panels: HashMap<String, PanelOutcome> = HashMap::new();
        let mut summaries: HashMap<String, String> = HashMap::new();

        pipeline.advance();

        while let ReviewStage::Processing(i) = pipeline.stage() {
            let goal = &input.goals[i];
            tracing::debug!(goal_id = %goal.goal_id, "convening panel");
            self.emit(
                CouncilEvent::new(CouncilEventKind::PanelStarted, "panel")
                    .with_goal(&goal.goal_id),
            )
            .await;

            let request = ReviewRequest::new(&goal.goal_id, &goal.goal_text);
            let outcome = match self.panel.run(&request, &goal.selected_experts).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.emit(
                        CouncilEvent::new(CouncilEventKind::ReviewFailed, "panel")
                            .with_goal(&goal.goal_id),
                    )
                    .await;
                    return Err(e);
                }
            };

            for review in &outcome.reviews {
                self.emit(
                    CouncilEvent::new(CouncilEventKind::ExpertCompleted, &review.expert_id)
                        .with_goal(&goal.goal_id),
                )
                .await;
            }
            self.emit(
                CouncilEvent::new(CouncilEventKind::PanelCompleted, "panel")
                    .with_goal(&goal.goal_id)
                    .with_data(serde_json::json!({ "reviews": outcome.reviews.len() })),
            )
            .await;

            let summary = match self
                .synthesis
                .synthesize(&goal.goal_text, &outcome.reviews)
                .await
            {
                Ok(summary) => summary,
                Err(e) => {
                    self.emit(
                        CouncilEvent::new(CouncilEventKind::ReviewFailed, "orchestrator")
                            .with_goal(&goal.goal_id),
                    )
                    .await;
                    return Err(e);
                }
            };
            self.emit(
                CouncilEvent::new(CouncilEventKind::SynthesisCompleted, "orchestrator")
                    .with_goal(&goal.goal_id),
            )
            .await;

            panels.insert(goal.goal_id.clone(), outcome);
            summaries.insert(goal.goal_id.clone(), summary);
            pipeline.advance();
        }

        // Stage 3: assemble outputs in input order. Missing map entries
        // fall back to inert defaults instead of panicking.
        let goals: Vec<GoalReviewOutput> = input
            .goals
            .iter()
            .map(|goal| {
                let validation = validations.get(&goal.goal_id);
                let panel = panels.get(&goal.goal_id);
                GoalReviewOutput {
                    goal_id: goal.goal_id.clone(),
                    validation_status: validation
                        .map(|v| v.status)
                        .unwrap_or(ValidationStatus::Pending),
                    validation_feedback: validation
                        .map(|v| v.feedback.clone())
                        .unwrap_or_default(),
                    expert_summary: summaries.get(&goal.goal_id).cloned().unwrap_or_default(),
                    expert_reviews: panel.map(|p| p.reviews.clone()).unwrap_or_default(),
                    progress_estimate: panel.map(|p| p.estimate.clone()),
                }
            })
            .collect();

        let overall_feedback = overall_feedback(&goals);

        self.emit(CouncilEvent::new(
            CouncilEventKind::ReviewCompleted,
            "coordinator",
        ))
        .await;

        Ok(GoalSetReviewOutput {
            goal_set_id: input.goal_set_id.clone(),
            goals,
            overall_feedback,
        })
    }
}

/// Batch-level feedback as a pure function of the status counts.
/// Rejections outrank warnings; a clean set gets the congratulation.
fn overall_feedback(goals: &[GoalReviewOutput]) -> String {
    let rejected = count_status(goals, ValidationStatus::Rejected);
    let warnings = count_status(goals, ValidationStatus::Warning);

    if rejected > 0 {
        return format!(
            "{} goal(s) need revision before proceeding. Please review the feedback and update your goals.",
            rejected
        );
    }
    if warnings > 0 {
        return format!(
            "All goals are acceptable, but {} could be improved. Consider the expert suggestions.",
            warnings
        );
    }
    format!(
        "Excellent! All {} goals meet SMART criteria. Your expert council has provided insights to help you succeed.",
        goals.len()
    )
}

fn count_status(goals: &[GoalReviewOutput], status: ValidationStatus) -> usize {
    goals
        .iter()
        .filter(|g| g.validation_status == status)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::FnGenerator;

    const ESTIMATE_JSON: &str = r#"{"unit": "demos", "estimatedPerDay": 2, "estimatedPerWeek": 8}"#;

    /// Routes every council call to a deterministic reply, forcing the
    /// given validation status for every goal.
    fn scripted_council(validation_status: &'static str) -> Arc<dyn TextGenerator> {
        Arc::new(FnGenerator::new(move |system: &str, prompt: &str| {
            if system.contains("goal validation expert") {
                Ok(format!(
                    r#"{{"status": "{}", "feedback": "Assessed."}}"#,
                    validation_status
                ))
            } else if system.contains("extraction assistant") {
                Ok(ESTIMATE_JSON.to_string())
            } else if system.contains("Orchestrator") {
                let preview: String = prompt.chars().take(40).collect();
                Ok(format!("Summary for: {}", preview))
            } else {
                Ok("Expert analysis.\n\nACTION ITEMS:\n- Do the thing".to_string())
            }
        }))
    }

    fn goal(id: &str, text: &str, order: u8, experts: &[&str]) -> GoalInput {
        GoalInput {
            goal_id: id.to_string(),
            goal_text: text.to_string(),
            goal_order: order,
            selected_experts: experts.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn input(goals: Vec<GoalInput>) -> GoalSetReviewInput {
        GoalSetReviewInput {
            goal_set_id: "set-1".to_string(),
            user_id: "user-1".to_string(),
            goals,
        }
    }

    #[tokio::test]
    async fn test_output_preserves_input_goal_order() {
        let mut coordinator = CouncilCoordinator::new(scripted_council("valid"));
        let input = input(vec![
            goal("goal-c", "Run 10 demos", 1, &["strategist"]),
            goal("goal-a", "Mentor 5 people", 2, &[]),
            goal("goal-b", "Ship 3 features", 3, &["motivator", "wellness_guide"]),
        ]);

        let output = coordinator.review_goal_set(&input).await.unwrap();

        assert_eq!(output.goal_set_id, "set-1");
        let order: Vec<&str> = output.goals.iter().map(|g| g.goal_id.as_str()).collect();
        assert_eq!(order, vec!["goal-c", "goal-a", "goal-b"]);
    }

    #[tokio::test]
    async fn test_end_to_end_single_goal_review() {
        let mut coordinator = CouncilCoordinator::new(scripted_council("valid"));
        let input = input(vec![goal(
            "goal-1",
            "Run 10 product demos with enterprise clients by March 31",
            1,
            &["strategist"],
        )]);

        let output = coordinator.review_goal_set(&input).await.unwrap();
        let reviewed = &output.goals[0];

        assert_eq!(reviewed.expert_reviews.len(), 2);
        assert_eq!(reviewed.expert_reviews[0].expert_id, "progress_tracker");
        assert_eq!(reviewed.expert_reviews[1].expert_id, "strategist");
        assert_ne!(reviewed.validation_status, ValidationStatus::Pending);
        assert!(!reviewed.expert_summary.is_empty());

        let estimate = reviewed.progress_estimate.as_ref().unwrap();
        assert!(estimate.estimated_per_day > 0.0);
        assert_eq!(estimate.goal_id, "goal-1");
    }

    #[tokio::test]
    async fn test_every_processed_goal_has_an_estimate() {
        let mut coordinator = CouncilCoordinator::new(scripted_council("valid"));
        let input = input(vec![
            goal("goal-1", "Run 10 demos", 1, &[]),
            goal("goal-2", "Mentor 5 people", 2, &[]),
            goal("goal-3", "Ship 3 features", 3, &[]),
        ]);

        let output = coordinator.review_goal_set(&input).await.unwrap();
        assert!(output.goals.iter().all(|g| g.progress_estimate.is_some()));
    }

    #[tokio::test]
    async fn test_panel_failure_aborts_with_no_partial_output() {
        let generator = Arc::new(FnGenerator::new(|system: &str, _: &str| {
            if system.contains("Strategic Planner") {
                anyhow::bail!("strategist offline")
            } else if system.contains("goal validation expert") {
                Ok(r#"{"status": "valid", "feedback": "ok"}"#.to_string())
            } else if system.contains("extraction assistant") {
                Ok(ESTIMATE_JSON.to_string())
            } else {
                Ok("fine".to_string())
            }
        }));
        let mut coordinator = CouncilCoordinator::new(generator);
        let input = input(vec![
            goal("goal-1", "Mentor 5 people", 1, &[]),
            goal("goal-2", "Run 10 demos", 2, &["strategist"]),
            goal("goal-3", "Ship 3 features", 3, &[]),
        ]);

        let result = coordinator.review_goal_set(&input).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("strategist offline"));
        assert!(coordinator
            .events()
            .iter()
            .any(|e| e.kind == CouncilEventKind::ReviewFailed));
    }

    #[tokio::test]
    async fn test_synthesis_failure_aborts_the_run() {
        let generator = Arc::new(FnGenerator::new(|system: &str, _: &str| {
            if system.contains("Orchestrator") {
                anyhow::bail!("synthesis offline")
            } else if system.contains("goal validation expert") {
                Ok(r#"{"status": "valid", "feedback": "ok"}"#.to_string())
            } else if system.contains("extraction assistant") {
                Ok(ESTIMATE_JSON.to_string())
            } else {
                Ok("fine".to_string())
            }
        }));
        let mut coordinator = CouncilCoordinator::new(generator);
        let input = input(vec![goal("goal-1", "Run 10 demos", 1, &[])]);

        assert!(coordinator.review_goal_set(&input).await.is_err());
    }

    #[tokio::test]
    async fn test_isolate_mode_survives_a_flaky_expert() {
        let generator = Arc::new(FnGenerator::new(|system: &str, _: &str| {
            if system.contains("Strategic Planner") {
                anyhow::bail!("strategist offline")
            } else if system.contains("goal validation expert") {
                Ok(r#"{"status": "valid", "feedback": "ok"}"#.to_string())
            } else if system.contains("extraction assistant") {
                Ok(ESTIMATE_JSON.to_string())
            } else {
                Ok("fine".to_string())
            }
        }));
        let config = CouncilConfig {
            panel_failure_mode: PanelFailureMode::Isolate,
        };
        let mut coordinator = CouncilCoordinator::with_config(generator, config);
        let input = input(vec![goal("goal-1", "Run 10 demos", 1, &["strategist"])]);

        let output = coordinator.review_goal_set(&input).await.unwrap();
        let reviews = &output.goals[0].expert_reviews;
        assert_eq!(reviews.len(), 2);
        assert!(reviews[1].review_content.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_events_stream_over_the_channel() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut coordinator =
            CouncilCoordinator::new(scripted_council("valid")).with_event_channel(tx);
        let input = input(vec![goal("goal-1", "Run 10 demos", 1, &[])]);

        coordinator.review_goal_set(&input).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.kind);
        }
        assert_eq!(kinds.first(), Some(&CouncilEventKind::ReviewStarted));
        assert_eq!(kinds.last(), Some(&CouncilEventKind::ReviewCompleted));
        assert!(kinds.contains(&CouncilEventKind::GoalValidated));
        assert!(kinds.contains(&CouncilEventKind::PanelCompleted));
        assert!(kinds.contains(&CouncilEventKind::SynthesisCompleted));
    }

    #[test]
    fn test_rejections_outrank_warnings_in_overall_feedback() {
        let output = |status: ValidationStatus| GoalReviewOutput {
            goal_id: "g".to_string(),
            validation_status: status,
            validation_feedback: String::new(),
            expert_summary: String::new(),
            expert_reviews: vec![],
            progress_estimate: None,
        };

        let goals = vec![
            output(ValidationStatus::Rejected),
            output(ValidationStatus::Rejected),
            output(ValidationStatus::Warning),
        ];
        let feedback = overall_feedback(&goals);
        assert!(feedback.starts_with("2 goal(s) need revision"));

        let goals = vec![
            output(ValidationStatus::Valid),
            output(ValidationStatus::Warning),
        ];
        let feedback = overall_feedback(&goals);
        assert!(feedback.contains("1 could be improved"));

        let goals = vec![
            output(ValidationStatus::Valid),
            output(ValidationStatus::Valid),
            output(ValidationStatus::Valid),
        ];
        let feedback = overall_feedback(&goals);
        assert!(feedback.contains("All 3 goals meet SMART criteria"));
    }

    #[tokio::test]
    async fn test_overall_feedback_cites_rejections_from_a_real_run() {
        let mut coordinator = CouncilCoordinator::new(scripted_council("rejected"));
        let input = input(vec![
            goal("goal-1", "be better", 1, &[]),
            goal("goal-2", "do more", 2, &[]),
        ]);

        let output = coordinator.review_goal_set(&input).await.unwrap();
        assert!(output.overall_feedback.starts_with("2 goal(s) need revision"));
    }
}
