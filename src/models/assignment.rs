//! Assignment board: the per-session coverage state.
//!
//! The board is the only mutable shared state in the system. All
//! mutation goes through the two primitives `assign` and `unassign`;
//! both reject inconsistent input and leave the board unchanged on
//! failure. There is exactly one writer (the local session), so no
//! optimistic concurrency control is needed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::AssignError;

use super::slot::Slot;

/// One teacher placed in one slot, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Covering teacher.
    pub teacher_id: String,
    /// Why this teacher was placed here.
    pub reason: String,
}

/// The in-memory (class, period) → covering-teachers map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentBoard {
    slots: HashMap<(String, u8), Vec<SlotEntry>>,
}

impl AssignmentBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one teacher to one slot.
    ///
    /// Rejects a teacher already present in the slot
    /// (`AssignError::AlreadyAssigned`) and a teacher already committed
    /// to a *different* class in the same period (`AssignError::Conflict`).
    /// On rejection no state changes.
    pub fn assign(
        &mut self,
        class_id: impl Into<String>,
        period: u8,
        teacher_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<(), AssignError> {
        let class_id = class_id.into();
        let teacher_id = teacher_id.into();

        if let Some(existing_class) = self.class_for_teacher(&teacher_id, period) {
            if existing_class == class_id {
                return Err(AssignError::AlreadyAssigned {
                    teacher_id,
                    class_id,
                    period,
                });
            }
            return Err(AssignError::Conflict {
                teacher_id,
                existing_class: existing_class.to_string(),
                period,
            });
        }

        self.slots
            .entry((class_id, period))
            .or_default()
            .push(SlotEntry {
                teacher_id,
                reason: reason.into(),
            });
        Ok(())
    }

    /// Removes one teacher from one slot.
    pub fn unassign(
        &mut self,
        class_id: &str,
        period: u8,
        teacher_id: &str,
    ) -> Result<(), AssignError> {
        let key = (class_id.to_string(), period);
        let entries = self.slots.get_mut(&key);
        let removed = match entries {
            Some(list) => {
                let before = list.len();
                list.retain(|e| e.teacher_id != teacher_id);
                let removed = list.len() < before;
                if list.is_empty() {
                    self.slots.remove(&key);
                }
                removed
            }
            None => false,
        };
        if removed {
            Ok(())
        } else {
            Err(AssignError::NotAssigned {
                teacher_id: teacher_id.to_string(),
                class_id: class_id.to_string(),
                period,
            })
        }
    }

    /// Entries for a slot, in placement order.
    pub fn entries(&self, class_id: &str, period: u8) -> &[SlotEntry] {
        self.slots
            .get(&(class_id.to_string(), period))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The class a teacher is committed to in a period, if any.
    pub fn class_for_teacher(&self, teacher_id: &str, period: u8) -> Option<&str> {
        self.slots
            .iter()
            .find(|((_, p), entries)| {
                *p == period && entries.iter().any(|e| e.teacher_id == teacher_id)
            })
            .map(|((class_id, _), _)| class_id.as_str())
    }

    /// Whether a teacher is already in a given slot.
    pub fn is_assigned(&self, class_id: &str, period: u8, teacher_id: &str) -> bool {
        self.entries(class_id, period)
            .iter()
            .any(|e| e.teacher_id == teacher_id)
    }

    /// Number of slots a teacher covers today, across all periods.
    pub fn cover_count(&self, teacher_id: &str) -> u32 {
        self.slots
            .values()
            .flat_map(|entries| entries.iter())
            .filter(|e| e.teacher_id == teacher_id)
            .count() as u32
    }

    /// Iterates all (slot, entry) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &SlotEntry)> {
        self.slots.iter().flat_map(|((class_id, period), entries)| {
            entries
                .iter()
                .map(move |e| (Slot::new(class_id.clone(), *period), e))
        })
    }

    /// Total number of placements.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether the board has no placements.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
