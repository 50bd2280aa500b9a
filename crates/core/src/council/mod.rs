//! # Council Orchestration
//!
//! The goal-set review workflow, from raw input to assembled report.
//!
//! ## Pipeline
//!
//! ```text
//! CouncilCoordinator
//!   ├── GoalValidator          (all goals, sequential, fail-soft)
//!   ├── per goal, in order:
//!   │     ├── ExpertPanelRunner (mandatory first, optional fan-out)
//!   │     └── SynthesisStage    (fail-hard narrative merge)
//!   └── output assembly + overall feedback
//! ```

pub mod coordinator;
pub mod events;
pub mod panel;
pub mod pipeline;
pub mod synthesis;

// Re-exports for convenience
pub use coordinator::{
    CouncilConfig, CouncilCoordinator, GoalInput, GoalReviewOutput, GoalSetReviewInput,
    GoalSetReviewOutput,
};
pub use events::{CouncilEvent, CouncilEventKind};
pub use panel::{ExpertPanelRunner, PanelFailureMode, PanelOutcome};
pub use pipeline::{ReviewPipeline, ReviewStage};
pub use synthesis::SynthesisStage;
