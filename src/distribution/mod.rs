//! Batch distribution algorithms.
//!
//! - **`fair`**: conflict-aware fair distribution for merged classes
//!   (rainy-day supervision)
//! - **`orchestrator`**: the per-mode batch pass tying discovery,
//!   pre-filter, golden rules, and the ladder together

pub mod fair;
pub mod orchestrator;

pub use fair::{FairDistributor, FairOutcome, MergeAssignment, TeacherProfile};
pub use orchestrator::{
    CompanionCandidate, DistributionBatch, Orchestrator, Proposal, SlotTrace,
};
