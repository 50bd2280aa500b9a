//! # Council Core
//!
//! The "Brain" of the Expert Council system - goal validation, expert
//! panel reviews, narrative synthesis, and activity extraction.
//!
//! ## Architecture
//!
//! - `experts/` - role-configured reviewer capabilities and the registry
//! - `council/` - goal-set review orchestration (panel, synthesis, events)
//! - `validation` - fail-soft SMART-rubric goal validation
//! - `extraction` - structured activities out of free-text daily updates
//! - `llm/` - the injectable text-generation capability and reply parsing
//! - `models` - provider configuration and generation profiles
//!
//! ## Usage
//!
//! ```rust,ignore
//! use council_core::{CouncilCoordinator, OpenAiClient};
//! use std::sync::Arc;
//!
//! let generator = Arc::new(OpenAiClient::from_env()?);
//! let mut coordinator = CouncilCoordinator::new(generator);
//! let report = coordinator.review_goal_set(&input).await?;
//! ```

pub mod council;
pub mod error;
pub mod experts;
pub mod extraction;
pub mod llm;
pub mod models;
pub mod validation;

// Re-exports for the common entry points
pub use council::{
    CouncilConfig, CouncilCoordinator, GoalInput, GoalSetReviewInput, GoalSetReviewOutput,
    PanelFailureMode,
};
pub use error::CouncilError;
pub use extraction::{ActivityExtractor, DailyUpdateInput, GoalRef};
pub use llm::{OpenAiClient, TextGenerator};
pub use models::{GenerationProfile, LlmProvider, ModelConfig};
