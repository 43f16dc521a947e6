//! Substitute-teacher coverage engine.
//!
//! Given a day's timetable, a staff roster, and an operating mode
//! (exam, trip, rainy day, emergency, holiday, normal), selects the best
//! available covering teacher for every vacant (class, period) slot.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Employee`, `Lesson`, `ClassItem`,
//!   `ModeConfig`, `GoldenRule`, `PriorityStep`, `AssignmentBoard`,
//!   `SubstitutionRecord`, `AbsenceRecord`
//! - **`discovery`**: Per-slot candidate enumeration and `SlotState`
//!   classification into pool / home-room / general buckets
//! - **`rules`**: Golden-rule constraint evaluation, priority-ladder
//!   scoring, and the mode-settings pre-filter
//! - **`distribution`**: Fair distribution for merged classes and the
//!   per-mode batch orchestrator
//! - **`session`**: Mutable working session — the two assignment
//!   primitives, absence auto-registration, substitution records
//! - **`validation`**: Snapshot integrity checks (duplicate IDs, dangling
//!   home-room links, timetable collisions)
//!
//! # Architecture
//!
//! Every distribution pass is a pure computation over read-only snapshots;
//! the in-memory assignment board is the only mutable state, and all
//! mutation goes through the two session primitives. The single randomized
//! step (the fair-distribution shuffle) sits behind an injectable seed.

pub mod discovery;
pub mod distribution;
pub mod error;
pub mod models;
pub mod rules;
pub mod session;
pub mod validation;

pub use error::AssignError;
