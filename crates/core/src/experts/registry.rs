//! # Expert Registry
//!
//! The council roster: a static map from expert id to a role-configured
//! reviewer instance. Built once per runtime around a shared generator and
//! never mutated afterwards. Looking up an id that is not on the roster is
//! caller misuse and fails with a typed, non-retryable error.

use crate::error::CouncilError;
use crate::experts::prompts;
use crate::experts::reviewer::{ExpertInfo, ExpertReviewer};
use crate::llm::TextGenerator;
use std::collections::HashMap;
use std::sync::Arc;

/// Id of the mandatory reviewer
pub const PROGRESS_TRACKER: &str = "progress_tracker";
pub const MOTIVATOR: &str = "motivator";
pub const STRATEGIST: &str = "strategist";
pub const ACCOUNTABILITY: &str = "accountability";
pub const OBSTACLE_ANALYST: &str = "obstacle_analyst";
pub const TIME_OPTIMIZER: &str = "time_optimizer";
pub const SKILL_ADVISOR: &str = "skill_advisor";
pub const WELLNESS_GUIDE: &str = "wellness_guide";

static ROSTER: [ExpertInfo; 8] = [
    ExpertInfo {
        id: PROGRESS_TRACKER,
        name: "Progress Tracker",
        description: "Defines metrics and estimates daily/weekly progress targets",
        required: true,
    },
    ExpertInfo {
        id: MOTIVATOR,
        name: "Motivation Coach",
        description: "Provides psychological strategies and encouragement",
        required: false,
    },
    ExpertInfo {
        id: STRATEGIST,
        name: "Strategic Planner",
        description: "Creates action plans and prioritization strategies",
        required: false,
    },
    ExpertInfo {
        id: ACCOUNTABILITY,
        name: "Accountability Partner",
        description: "Designs check-in structures and commitment devices",
        required: false,
    },
    ExpertInfo {
        id: OBSTACLE_ANALYST,
        name: "Obstacle Analyst",
        description: "Identifies potential blockers and mitigation strategies",
        required: false,
    },
    ExpertInfo {
        id: TIME_OPTIMIZER,
        name: "Time Optimizer",
        description: "Provides scheduling and time management advice",
        required: false,
    },
    ExpertInfo {
        id: SKILL_ADVISOR,
        name: "Skills Advisor",
        description: "Analyzes skills gaps and recommends learning resources",
        required: false,
    },
    ExpertInfo {
        id: WELLNESS_GUIDE,
        name: "Wellness Guide",
        description: "Focuses on work-life balance and burnout prevention",
        required: false,
    },
];

/// Static roster metadata, in display order
pub fn roster() -> &'static [ExpertInfo] {
    &ROSTER
}

/// Metadata for the mandatory reviewer
pub fn mandatory_info() -> ExpertInfo {
    ROSTER[0]
}

fn system_prompt(id: &str) -> &'static str {
    match id {
        PROGRESS_TRACKER => prompts::PROGRESS_TRACKER,
        MOTIVATOR => prompts::MOTIVATOR,
        STRATEGIST => prompts::STRATEGIST,
        ACCOUNTABILITY => prompts::ACCOUNTABILITY,
        OBSTACLE_ANALYST => prompts::OBSTACLE_ANALYST,
        TIME_OPTIMIZER => prompts::TIME_OPTIMIZER,
        SKILL_ADVISOR => prompts::SKILL_ADVISOR,
        WELLNESS_GUIDE => prompts::WELLNESS_GUIDE,
        other => unreachable!("roster id without a prompt: {other}"),
    }
}

/// Map from expert id to reviewer instance
pub struct ExpertRegistry {
    experts: HashMap<&'static str, Arc<ExpertReviewer>>,
}

impl ExpertRegistry {
    /// Build the full roster around one shared generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let experts = ROSTER
            .iter()
            .map(|info| {
                let reviewer =
                    ExpertReviewer::new(*info, system_prompt(info.id), generator.clone());
                (info.id, Arc::new(reviewer))
            })
            .collect();
        Self { experts }
    }

    /// Look up a reviewer by id. Unknown ids are fatal.
    pub fn get(&self, expert_id: &str) -> Result<Arc<ExpertReviewer>, CouncilError> {
        self.experts
            .get(expert_id)
            .cloned()
            .ok_or_else(|| CouncilError::UnknownExpert(expert_id.to_string()))
    }
}
