//! Per-slot candidate discovery.
//!
//! For a single target (class, period), enumerates every employee and
//! classifies their state relative to that slot, partitioned into three
//! buckets: bench/pool, home-room, and general staff.
//!
//! # Classification precedence
//!
//! 1. Excluded (trip companion, declared absent) — not a candidate.
//! 2. Released by a documented swap — best eligibility.
//! 3. Slot state from the employee's own lesson this period: free, stay,
//!    individual, actual. A teacher busy in a *non-target* class is not a
//!    candidate, unless they are the target's home-room teacher, who is
//!    always surfaced.
//! 4. Already assigned to another class this period — surfaced but never
//!    rankable.

mod context;

pub use context::DayContext;

use crate::models::{AssignmentBoard, Employee, LessonKind, Slot, SlotState};

/// One discovered candidate for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The employee.
    pub employee_id: String,
    /// Human-readable badge for the UI.
    pub label: String,
    /// State relative to the target slot.
    pub state: SlotState,
    /// Coarse rank; lower = more preferable. Ties keep discovery order.
    pub priority: u32,
    /// Home-room teacher of the target class.
    pub is_home_room: bool,
    /// Pre-declared bench/pool member.
    pub is_pool: bool,
}

/// Discovery output: three priority-sorted buckets.
///
/// Buckets are disjoint: pool membership wins over home-room tagging,
/// which wins over general staff.
#[derive(Debug, Clone, Default)]
pub struct CandidateBuckets {
    /// Bench/pool reserves.
    pub pool: Vec<Candidate>,
    /// The target class's home-room teacher(s).
    pub home_room: Vec<Candidate>,
    /// Everyone else.
    pub general: Vec<Candidate>,
}

impl CandidateBuckets {
    /// Candidates eligible for automatic ranking, in bucket order.
    /// Excludes anyone already assigned to a different class this period.
    pub fn rankable(&self) -> Vec<&Candidate> {
        self.pool
            .iter()
            .chain(self.home_room.iter())
            .chain(self.general.iter())
            .filter(|c| c.state != SlotState::AssignedElsewhere)
            .collect()
    }

    /// Total surfaced candidates.
    pub fn len(&self) -> usize {
        self.pool.len() + self.home_room.len() + self.general.len()
    }

    /// Whether nothing was surfaced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discovers and buckets candidates for one target slot.
pub fn discover(ctx: &DayContext, board: &AssignmentBoard, target: &Slot) -> CandidateBuckets {
    let mut buckets = CandidateBuckets::default();

    for employee in &ctx.roster {
        let Some(candidate) = classify(ctx, board, target, employee) else {
            continue;
        };
        if candidate.is_pool {
            buckets.pool.push(candidate);
        } else if candidate.is_home_room {
            buckets.home_room.push(candidate);
        } else {
            buckets.general.push(candidate);
        }
    }

    sort_stable(&mut buckets.pool);
    sort_stable(&mut buckets.home_room);
    sort_stable(&mut buckets.general);
    buckets
}

/// Classifies one employee against the target slot.
///
/// Returns `None` when the employee is not a candidate at all.
pub fn classify(
    ctx: &DayContext,
    board: &AssignmentBoard,
    target: &Slot,
    employee: &Employee,
) -> Option<Candidate> {
    if ctx.excluded.contains(&employee.id) {
        return None;
    }
    if ctx.absences.is_absent(&employee.id, target.period) {
        return None;
    }

    let is_home_room = employee.is_home_room_of(&target.class_id);
    let is_pool = ctx.pool.iter().any(|p| p == &employee.id);

    let (state, label) = if ctx.swap_released.contains(&employee.id) {
        (SlotState::Released, SlotState::Released.label().to_string())
    } else {
        match ctx.lesson_for(&employee.id, target.period) {
            None => (SlotState::Free, SlotState::Free.label().to_string()),
            Some(lesson) => match lesson.kind {
                LessonKind::Stay => (SlotState::Stay, SlotState::Stay.label().to_string()),
                LessonKind::Individual => (
                    SlotState::Individual,
                    SlotState::Individual.label().to_string(),
                ),
                LessonKind::Actual => {
                    let class_id = lesson.class_id.as_deref().unwrap_or("");
                    if ctx.excused_classes.contains(class_id) {
                        (
                            SlotState::ReleasedByTrip,
                            SlotState::ReleasedByTrip.label().to_string(),
                        )
                    } else if class_id == target.class_id {
                        (
                            SlotState::Actual,
                            "regular teacher of this class".to_string(),
                        )
                    } else if is_home_room {
                        // Surfaced despite being busy; reachable via swap.
                        (SlotState::Actual, format!("teaching {class_id}"))
                    } else {
                        return None;
                    }
                }
                LessonKind::Duty => {
                    if is_home_room {
                        (SlotState::Actual, "on duty".to_string())
                    } else {
                        return None;
                    }
                }
            },
        }
    };

    // Assignment state overrides the lesson-derived state for any class
    // other than the one already holding this teacher.
    let (state, label) = match board.class_for_teacher(&employee.id, target.period) {
        Some(assigned_class) if assigned_class != target.class_id => (
            SlotState::AssignedElsewhere,
            format!("covering {assigned_class}"),
        ),
        _ => (state, label),
    };

    Some(Candidate {
        employee_id: employee.id.clone(),
        label,
        state,
        priority: state.base_priority(),
        is_home_room,
        is_pool,
    })
}

fn sort_stable(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| c.priority);
}
