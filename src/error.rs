//! Error taxonomy for the assignment mutation primitives.
//!
//! None of these are fatal: a rejected mutation leaves the board
//! untouched and the caller surfaces the error as a notification.
//! "No candidate found" and "mode has no rule set" are data outcomes,
//! not errors — see `distribution::DistributionBatch`.

use thiserror::Error;

/// A rejected assignment or removal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The teacher is already committed to a different class in the same
    /// period. The existing assignment is untouched.
    #[error("teacher '{teacher_id}' is already covering class '{existing_class}' in period {period}")]
    Conflict {
        teacher_id: String,
        existing_class: String,
        period: u8,
    },

    /// The teacher is already present in this slot's list. Batch paths
    /// skip this silently instead of re-adding.
    #[error("teacher '{teacher_id}' is already in slot ({class_id}, period {period})")]
    AlreadyAssigned {
        teacher_id: String,
        class_id: String,
        period: u8,
    },

    /// The teacher id does not exist in the roster.
    #[error("unknown teacher id '{0}'")]
    UnknownTeacher(String),

    /// The class id does not exist.
    #[error("unknown class id '{0}'")]
    UnknownClass(String),

    /// The period is outside the school day (1..=period_count).
    #[error("period {0} is outside the school day")]
    InvalidPeriod(u8),

    /// Removal of an assignment that does not exist.
    #[error("teacher '{teacher_id}' is not assigned to slot ({class_id}, period {period})")]
    NotAssigned {
        teacher_id: String,
        class_id: String,
        period: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = AssignError::Conflict {
            teacher_id: "t1".into(),
            existing_class: "5A".into(),
            period: 3,
        };
        assert!(e.to_string().contains("t1"));
        assert!(e.to_string().contains("5A"));
        assert!(e.to_string().contains("period 3"));

        let e = AssignError::UnknownTeacher("ghost".into());
        assert_eq!(e.to_string(), "unknown teacher id 'ghost'");
    }
}
