//! Coverage slots and candidate slot states.

use serde::{Deserialize, Serialize};

/// A (class, period) pair requiring coverage on the working day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Target class.
    pub class_id: String,
    /// Target period (1-based).
    pub period: u8,
}

impl Slot {
    /// Creates a slot.
    pub fn new(class_id: impl Into<String>, period: u8) -> Self {
        Self {
            class_id: class_id.into(),
            period,
        }
    }
}

/// An employee's state relative to a target slot.
///
/// Closed classification with exhaustive matching in the scorer —
/// replaces the string-typed status tags of earlier designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// No lesson this period.
    Free,
    /// On a protected catch-up period. Covered by the stay-protection rule.
    Stay,
    /// On a one-on-one support period, convertible to coverage.
    Individual,
    /// On a regular teaching lesson this period. For the target class
    /// this is the slot's regular teacher; for another class it marks a
    /// surfaced home-room teacher reachable only through a swap.
    Actual,
    /// Freed by a documented swap.
    Released,
    /// Freed because their own class is out on a trip.
    ReleasedByTrip,
    /// Already covering a different class this period.
    AssignedElsewhere,
}

impl SlotState {
    /// Coarse eligibility rank. Lower = more preferable.
    pub fn base_priority(&self) -> u32 {
        match self {
            SlotState::Released => 0,
            SlotState::ReleasedByTrip => 1,
            SlotState::Free => 2,
            SlotState::Individual => 3,
            SlotState::Actual => 4,
            SlotState::Stay => 5,
            SlotState::AssignedElsewhere => 6,
        }
    }

    /// Human-readable badge text.
    pub fn label(&self) -> &'static str {
        match self {
            SlotState::Free => "free period",
            SlotState::Stay => "catch-up period (protected)",
            SlotState::Individual => "individual support period",
            SlotState::Actual => "on a teaching lesson this period",
            SlotState::Released => "released (documented swap)",
            SlotState::ReleasedByTrip => "released (class on trip)",
            SlotState::AssignedElsewhere => "already covering another class",
        }
    }
}
