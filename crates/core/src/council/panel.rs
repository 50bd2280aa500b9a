//! # Expert Panel
//!
//! Convenes the council for one goal. The mandatory Progress Tracker runs
//! first and alone; the caller-selected optional experts then fan out
//! concurrently and join as a unit. Goals never share a panel, so peak
//! concurrency is bounded by the number of experts selected for the goal
//! currently being processed.

use crate::experts::progress_tracker::{ProgressEstimate, ProgressTracker};
use crate::experts::registry::{self, ExpertRegistry};
use crate::experts::reviewer::{ExpertInfo, ExpertReview, ExpertReviewer, ReviewRequest};
use crate::llm::TextGenerator;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

/// What happens to the panel when one optional expert fails.
///
/// `Strict` keeps the all-or-nothing join: a single failure rejects the
/// panel and, because the orchestrator is also fail-hard, aborts the whole
/// goal-set run. `Isolate` degrades the failed seat to a placeholder
/// review so one flaky expert cannot sink the batch. The mandatory
/// reviewer is never isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelFailureMode {
    #[default]
    Strict,
    Isolate,
}

/// Collected output of one goal's panel
#[derive(Debug, Clone)]
pub struct PanelOutcome {
    /// Mandatory review first, then optional reviews in selection order
    pub reviews: Vec<ExpertReview>,
    pub estimate: ProgressEstimate,
}

/// Runs the per-goal fan-out/fan-in
pub struct ExpertPanelRunner {
    registry: ExpertRegistry,
    tracker: ProgressTracker,
    failure_mode: PanelFailureMode,
}

impl ExpertPanelRunner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            registry: ExpertRegistry::new(generator.clone()),
            tracker: ProgressTracker::new(generator),
            failure_mode: PanelFailureMode::default(),
        }
    }

    /// Set the failure policy for optional experts
    pub fn with_failure_mode(mut self, mode: PanelFailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Convene the panel for one goal.
    ///
    /// The Progress Tracker always runs first, whether or not it appears in
    /// `selected_experts`. Optional experts run concurrently; the join is
    /// all-or-nothing under [`PanelFailureMode::Strict`].
    pub async fn run(
        &self,
        request: &ReviewRequest,
        selected_experts: &[String],
    ) -> Result<PanelOutcome> {
        let report = self.tracker.invoke(request).await?;
        let mut reviews = vec![report.review];

        // Selection order drives output order; the mandatory seat is
        // excluded and duplicates collapse to their first occurrence.
        let optional_ids = optional_ids(selected_experts);

        // Resolve every reviewer up front so an unknown id fails before any
        // optional call is issued.
        let reviewers = optional_ids
            .iter()
            .map(|id| self.registry.get(id))
            .collect::<Result<Vec<_>, _>>()?;

        reviews.extend(self.join_optional(request, reviewers).await?);

        Ok(PanelOutcome {
            reviews,
            estimate: report.estimate,
        })
    }

    /// Fan out to the optional reviewers and join them, preserving the
    /// order the ids were selected in.
    async fn join_optional(
        &self,
        request: &ReviewRequest,
        reviewers: Vec<Arc<ExpertReviewer>>,
    ) -> Result<Vec<ExpertReview>> {
        let total = reviewers.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mode = self.failure_mode;
        let mut join_set = JoinSet::new();

        for (slot, reviewer) in reviewers.into_iter().enumerate() {
            let request = request.clone();
            join_set.spawn(async move {
                match reviewer.invoke(&request).await {
                    Ok(review) => Ok((slot, review)),
                    Err(e) => match mode {
                        PanelFailureMode::Strict => Err(e),
                        PanelFailureMode::Isolate => {
                            tracing::warn!(
                                expert_id = reviewer.info().id,
                                goal_id = %request.goal_id,
                                "expert failed, degrading to placeholder review: {e:#}"
                            );
                            Ok((slot, placeholder_review(reviewer.info())))
                        }
                    },
                }
            });
        }

        let mut slots: Vec<Option<ExpertReview>> = vec![None; total];
        let mut first_error: Option<anyhow::Error> = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok((slot, review))) => slots[slot] = Some(review),
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(anyhow!("panel task panicked: {e}"));
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Selected ids minus the mandatory seat, deduplicated in order.
fn optional_ids(selected_experts: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for id in selected_experts {
        if id != registry::PROGRESS_TRACKER && !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}

/// Degraded stand-in used under [`PanelFailureMode::Isolate`].
fn placeholder_review(info: &ExpertInfo) -> ExpertReview {
    ExpertReview {
        expert_id: info.id.to_string(),
        expert_name: info.name.to_string(),
        review_content: format!(
            "{} was unavailable for this goal and no review was produced. \
             Re-run the review to get this perspective.",
            info.name
        ),
        action_items: vec![],
    }
}
