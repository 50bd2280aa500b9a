//! # Council Experts
//!
//! Role-specialized reviewer capabilities for the goal review council.
//!
//! ## Architecture
//!
//! ```text
//! ExpertRegistry (id -> reviewer, built once)
//!   └── ExpertReviewer (one generic behavior, role as data)
//!         └── ProgressTracker (composes the generic behavior with a
//!             structured progress-estimate extraction)
//! ```
//!
//! Every seat shares the same generic reviewer; a role is just an
//! [`reviewer::ExpertInfo`] plus a bundled system prompt. The Progress
//! Tracker is the only specialized variant and the only seat that runs for
//! every goal.

pub mod progress_tracker;
pub mod prompts;
pub mod registry;
pub mod reviewer;

// Re-exports for convenience
pub use progress_tracker::{ProgressEstimate, ProgressReport, ProgressTracker};
pub use registry::ExpertRegistry;
pub use reviewer::{ExpertInfo, ExpertReview, ExpertReviewer, ReviewRequest};
