//! Constraint and preference evaluation.
//!
//! Three layers, applied in order per slot:
//!
//! 1. **`settings`** — coarse mode-settings pre-filter; removes
//!    candidates cheaply before any rule evaluation runs.
//! 2. **`golden`** — golden-rule evaluation; hard blocks and soft
//!    penalties, each attributable to a rule id.
//! 3. **`ladder`** — priority-ladder scoring; ranks the survivors and
//!    produces an explainable score breakdown.

pub mod golden;
pub mod ladder;
pub mod settings;

pub use golden::{evaluate_rules, effective_rules, is_blocked, total_penalty, RuleInput, RuleOutcome, RuleVerdict};
pub use ladder::{score_candidate, MatchFacts, ScoreBreakdown, ScoreEntry};
pub use settings::prefilter;
