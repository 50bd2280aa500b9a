//! Prompt templates bundled at compile time.
//!
//! Role prompts are the static half of each expert: one markdown file per
//! role, plus the templates used by validation, synthesis, and the two
//! structured-extraction calls. Templates substitute `{snake_case}`
//! placeholders with `str::replace`.

/// Progress Tracker - metrics and daily/weekly targets (mandatory reviewer)
pub const PROGRESS_TRACKER: &str = include_str!("defaults/progress_tracker.md");

/// Motivation Coach - psychological strategies and encouragement
pub const MOTIVATOR: &str = include_str!("defaults/motivator.md");

/// Strategic Planner - action plans and prioritization
pub const STRATEGIST: &str = include_str!("defaults/strategist.md");

/// Accountability Partner - check-in structures and commitment devices
pub const ACCOUNTABILITY: &str = include_str!("defaults/accountability.md");

/// Obstacle Analyst - blockers and mitigation strategies
pub const OBSTACLE_ANALYST: &str = include_str!("defaults/obstacle_analyst.md");

/// Time Optimizer - scheduling and time management
pub const TIME_OPTIMIZER: &str = include_str!("defaults/time_optimizer.md");

/// Skills Advisor - skills gaps and learning resources
pub const SKILL_ADVISOR: &str = include_str!("defaults/skill_advisor.md");

/// Wellness Guide - work-life balance and burnout prevention
pub const WELLNESS_GUIDE: &str = include_str!("defaults/wellness_guide.md");

/// SMART-rubric validation template (`{goal_text}`)
pub const VALIDATION: &str = include_str!("defaults/validation.md");

/// Orchestrator system instruction for synthesis
pub const SYNTHESIS: &str = include_str!("defaults/synthesis.md");

/// Synthesis task template (`{goal_text}`, `{expert_reviews}`)
pub const SYNTHESIS_TASK: &str = include_str!("defaults/synthesis_task.md");

/// Progress metrics extraction template (`{goal_text}`)
pub const PROGRESS_EXTRACTION: &str = include_str!("defaults/progress_extraction.md");

/// Activity extraction template (`{update_text}`, `{update_period}`,
/// `{period_date}`, `{goals}`)
pub const ACTIVITY_EXTRACTION: &str = include_str!("defaults/activity_extraction.md");

/// All bundled prompts with their slugs
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("progress_tracker", PROGRESS_TRACKER),
        ("motivator", MOTIVATOR),
        ("strategist", STRATEGIST),
        ("accountability", ACCOUNTABILITY),
        ("obstacle_analyst", OBSTACLE_ANALYST),
        ("time_optimizer", TIME_OPTIMIZER),
        ("skill_advisor", SKILL_ADVISOR),
        ("wellness_guide", WELLNESS_GUIDE),
        ("validation", VALIDATION),
        ("synthesis", SYNTHESIS),
        ("synthesis_task", SYNTHESIS_TASK),
        ("progress_extraction", PROGRESS_EXTRACTION),
        ("activity_extraction", ACTIVITY_EXTRACTION),
    ]
}
