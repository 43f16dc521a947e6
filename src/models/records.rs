//! Substitution and absence records.
//!
//! Substitution records are the immutable audit trail of committed
//! assignments: corrections are new records, never edits. Absence
//! records track declared teacher absences; a partial absence grows by
//! union of periods and never shrinks implicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::mode::ModeKind;

/// Audit entry for one committed assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    /// ISO date of the covered day.
    pub date: String,
    /// Covered period.
    pub period: u8,
    /// Covered class.
    pub class_id: String,
    /// The teacher whose slot was covered, when known.
    pub absent_teacher_id: Option<String>,
    /// The covering teacher.
    pub substitute_id: String,
    /// Why this substitute was chosen.
    pub reason: String,
    /// Mode the assignment was made under.
    pub mode: ModeKind,
}

impl SubstitutionRecord {
    /// Creates a record.
    pub fn new(
        date: impl Into<String>,
        class_id: impl Into<String>,
        period: u8,
        substitute_id: impl Into<String>,
        mode: ModeKind,
    ) -> Self {
        Self {
            date: date.into(),
            period,
            class_id: class_id.into(),
            absent_teacher_id: None,
            substitute_id: substitute_id.into(),
            reason: String::new(),
            mode,
        }
    }

    /// Sets the absent teacher.
    pub fn for_absent(mut self, teacher_id: impl Into<String>) -> Self {
        self.absent_teacher_id = Some(teacher_id.into());
        self
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Absence extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceKind {
    /// Absent the whole day.
    Full,
    /// Absent for specific periods only.
    Partial,
}

/// A teacher's declared absence for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// Absent teacher.
    pub teacher_id: String,
    /// ISO date.
    pub date: String,
    /// Full-day or partial.
    pub kind: AbsenceKind,
    /// Affected periods for a partial absence. Ignored for full.
    pub affected_periods: BTreeSet<u8>,
}

impl AbsenceRecord {
    /// Creates a full-day absence.
    pub fn full(teacher_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            date: date.into(),
            kind: AbsenceKind::Full,
            affected_periods: BTreeSet::new(),
        }
    }

    /// Creates a partial absence for the given periods.
    pub fn partial(
        teacher_id: impl Into<String>,
        date: impl Into<String>,
        periods: impl IntoIterator<Item = u8>,
    ) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            date: date.into(),
            kind: AbsenceKind::Partial,
            affected_periods: periods.into_iter().collect(),
        }
    }

    /// Whether this absence covers the given period.
    pub fn covers(&self, period: u8) -> bool {
        match self.kind {
            AbsenceKind::Full => true,
            AbsenceKind::Partial => self.affected_periods.contains(&period),
        }
    }
}

/// The day's declared absences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbsenceLog {
    records: Vec<AbsenceRecord>,
}

impl AbsenceLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record as-is.
    pub fn add(&mut self, record: AbsenceRecord) {
        self.records.push(record);
    }

    /// Builder: adds a record and returns self.
    pub fn with(mut self, record: AbsenceRecord) -> Self {
        self.add(record);
        self
    }

    /// Whether the teacher is absent in the given period.
    pub fn is_absent(&self, teacher_id: &str, period: u8) -> bool {
        self.records
            .iter()
            .any(|r| r.teacher_id == teacher_id && r.covers(period))
    }

    /// Ensures an absence covering (teacher, period) exists.
    ///
    /// Used when a manual assignment is made for a teacher with no
    /// declared absence: a partial record is auto-registered, or an
    /// existing partial record grows by union. Returns whether a record
    /// was created or extended.
    pub fn ensure(&mut self, teacher_id: &str, date: &str, period: u8) -> bool {
        if self.is_absent(teacher_id, period) {
            return false;
        }
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| r.teacher_id == teacher_id && r.date == date && r.kind == AbsenceKind::Partial)
        {
            existing.affected_periods.insert(period);
            return true;
        }
        self.records
            .push(AbsenceRecord::partial(teacher_id, date, [period]));
        true
    }

    /// All records.
    pub fn records(&self) -> &[AbsenceRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_absence_covers_all_periods() {
        let r = AbsenceRecord::full("t1", "2026-03-02");
        assert!(r.covers(1));
        assert!(r.covers(8));
    }

    #[test]
    fn test_partial_absence() {
        let r = AbsenceRecord::partial("t1", "2026-03-02", [2, 3]);
        assert!(r.covers(2));
        assert!(!r.covers(4));
    }

    #[test]
    fn test_ensure_registers_new_absence() {
        let mut log = AbsenceLog::new();
        assert!(log.ensure("t1", "2026-03-02", 3));
        assert!(log.is_absent("t1", 3));
        assert!(!log.is_absent("t1", 4));
    }

    #[test]
    fn test_ensure_grows_by_union() {
        let mut log = AbsenceLog::new().with(AbsenceRecord::partial("t1", "2026-03-02", [2]));
        assert!(log.ensure("t1", "2026-03-02", 5));
        assert_eq!(log.records().len(), 1);
        assert!(log.is_absent("t1", 2));
        assert!(log.is_absent("t1", 5));
    }

    #[test]
    fn test_ensure_is_idempotent_when_covered() {
        let mut log = AbsenceLog::new().with(AbsenceRecord::full("t1", "2026-03-02"));
        assert!(!log.ensure("t1", "2026-03-02", 3));
        assert_eq!(log.records().len(), 1);
    }

    #[test]
    fn test_substitution_record_builder() {
        let r = SubstitutionRecord::new("2026-03-02", "5A", 3, "sub1", ModeKind::Exam)
            .for_absent("t1")
            .with_reason("home-room teacher swap");
        assert_eq!(r.absent_teacher_id.as_deref(), Some("t1"));
        assert_eq!(r.mode, ModeKind::Exam);
    }
}
