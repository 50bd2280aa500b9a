//! # Council Events
//!
//! Observability records emitted while a review run progresses. Events are
//! accumulated on the run result and optionally streamed over an mpsc
//! channel for UIs that want live progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of council event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CouncilEventKind {
    /// Review run started
    ReviewStarted,
    /// One goal got its validation verdict
    GoalValidated,
    /// Expert panel convened for one goal
    PanelStarted,
    /// One expert finished its review
    ExpertCompleted,
    /// Panel joined; all reviews for the goal collected
    PanelCompleted,
    /// Narrative summary produced for one goal
    SynthesisCompleted,
    /// Review run completed successfully
    ReviewCompleted,
    /// Review run aborted
    ReviewFailed,
}

/// An event in a review run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilEvent {
    /// Unique event ID
    pub id: String,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Kind of event
    pub kind: CouncilEventKind,
    /// Agent that produced this event
    pub agent: String,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Related goal ID if applicable
    #[serde(default)]
    pub goal_id: Option<String>,
}

impl CouncilEvent {
    /// Create a new event
    pub fn new(kind: CouncilEventKind, agent: &str) -> Self {
        Self {
            id: event_id(),
            timestamp: Utc::now(),
            kind,
            agent: agent.to_string(),
            data: None,
            goal_id: None,
        }
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add goal ID to the event
    pub fn with_goal(mut self, goal_id: &str) -> Self {
        self.goal_id = Some(goal_id.to_string());
        self
    }
}

/// Generate a simple unique id (not cryptographic)
fn event_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    let salt = RandomState::new().build_hasher().finish() as u32;
    format!("{:x}-{:x}", nanos, salt)
}
