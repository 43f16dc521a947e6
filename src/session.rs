//! The mutable working session for one day.
//!
//! Wraps the day context, the assignment board, and the substitution
//! audit trail behind the two mutation primitives. Manual and automatic
//! placement go through the same `assign`, so every committed slot gets
//! the same validation, the same absence auto-registration, and the
//! same audit record.

use tracing::debug;

use crate::discovery::{discover, CandidateBuckets, DayContext};
use crate::distribution::{DistributionBatch, Orchestrator};
use crate::error::AssignError;
use crate::models::{AssignmentBoard, ModeConfig, ModeKind, Slot, SubstitutionRecord};

/// One day's coverage session.
#[derive(Debug, Clone, Default)]
pub struct CoverageSession {
    /// The day snapshot. Mutable only through absence auto-registration.
    pub ctx: DayContext,
    /// The coverage state.
    pub board: AssignmentBoard,
    records: Vec<SubstitutionRecord>,
}

impl CoverageSession {
    /// Opens a session over a day context.
    pub fn new(ctx: DayContext) -> Self {
        Self {
            ctx,
            board: AssignmentBoard::new(),
            records: Vec::new(),
        }
    }

    /// Date-derived shuffle seed: re-running the same day reproduces
    /// the same tie-breaks, different days vary them.
    pub fn seed(&self) -> u64 {
        self.ctx
            .date
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
                (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    /// Discovered candidates for one slot.
    pub fn candidates(&self, class_id: &str, period: u8) -> Result<CandidateBuckets, AssignError> {
        self.check_class(class_id)?;
        self.check_period(period)?;
        Ok(discover(&self.ctx, &self.board, &Slot::new(class_id, period)))
    }

    /// Places a teacher in a slot.
    ///
    /// Validates the references, delegates conflict checks to the
    /// board, auto-registers an absence for the slot's scheduled
    /// teacher when none is declared, and writes the audit record.
    pub fn assign(
        &mut self,
        class_id: &str,
        period: u8,
        teacher_id: &str,
        reason: &str,
        mode: ModeKind,
    ) -> Result<(), AssignError> {
        self.check_teacher(teacher_id)?;
        self.check_class(class_id)?;
        self.check_period(period)?;

        self.board.assign(class_id, period, teacher_id, reason)?;

        let absent = self
            .ctx
            .scheduled_lesson(class_id, period)
            .map(|l| l.teacher_id.clone())
            .filter(|t| t != teacher_id);
        if let Some(original) = &absent {
            let date = self.ctx.date.clone();
            if self.ctx.absences.ensure(original, &date, period) {
                debug!(teacher = %original, period, "absence auto-registered");
            }
        }

        let mut record =
            SubstitutionRecord::new(&self.ctx.date, class_id, period, teacher_id, mode)
                .with_reason(reason);
        if let Some(original) = absent {
            record = record.for_absent(original);
        }
        self.records.push(record);
        Ok(())
    }

    /// Removes a teacher from a slot. The audit trail keeps the
    /// original record; corrections are visible as history, not edits.
    pub fn unassign(
        &mut self,
        class_id: &str,
        period: u8,
        teacher_id: &str,
    ) -> Result<(), AssignError> {
        self.check_period(period)?;
        self.board.unassign(class_id, period, teacher_id)
    }

    /// Runs one automatic distribution pass without mutating anything.
    pub fn run_auto(&self, mode: &ModeConfig, targets: &[Slot]) -> DistributionBatch {
        Orchestrator::new(&self.ctx, mode)
            .with_seed(self.seed())
            .run(&self.board, targets)
    }

    /// Runs a trip pass with a confirmed companion set.
    pub fn run_auto_with_companions(
        &self,
        mode: &ModeConfig,
        targets: &[Slot],
        companions: &[String],
    ) -> DistributionBatch {
        Orchestrator::new(&self.ctx, mode)
            .with_seed(self.seed())
            .with_companions(companions.iter().cloned())
            .run(&self.board, targets)
    }

    /// Applies a batch's proposals. Proposals that race an existing
    /// placement are skipped, not substituted. Returns how many were
    /// applied.
    pub fn apply(&mut self, batch: &DistributionBatch, mode: ModeKind) -> usize {
        let mut applied = 0;
        for p in &batch.proposals {
            match self.assign(&p.slot.class_id, p.slot.period, &p.teacher_id, &p.reason, mode) {
                Ok(()) => applied += 1,
                Err(AssignError::AlreadyAssigned { .. }) | Err(AssignError::Conflict { .. }) => {
                    debug!(
                        class = %p.slot.class_id,
                        period = p.slot.period,
                        teacher = %p.teacher_id,
                        "stale proposal skipped"
                    );
                }
                Err(err) => {
                    debug!(error = %err, "proposal rejected");
                }
            }
        }
        applied
    }

    /// The session's audit trail, in commit order.
    pub fn records(&self) -> &[SubstitutionRecord] {
        &self.records
    }

    fn check_teacher(&self, teacher_id: &str) -> Result<(), AssignError> {
        if self.ctx.employee(teacher_id).is_none() {
            return Err(AssignError::UnknownTeacher(teacher_id.to_string()));
        }
        Ok(())
    }

    fn check_class(&self, class_id: &str) -> Result<(), AssignError> {
        if self.ctx.class(class_id).is_none() {
            return Err(AssignError::UnknownClass(class_id.to_string()));
        }
        Ok(())
    }

    fn check_period(&self, period: u8) -> Result<(), AssignError> {
        if !self.ctx.period_in_day(period) {
            return Err(AssignError::InvalidPeriod(period));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassItem, Employee, Lesson};

    fn session() -> CoverageSession {
        CoverageSession::new(
            DayContext::new("2026-03-02", 1)
                .with_roster(vec![
                    Employee::teacher("absent"),
                    Employee::teacher("hr").with_home_room("5A"),
                    Employee::teacher("free").with_subject("math"),
                    Employee::teacher("stay"),
                ])
                .with_classes(vec![
                    ClassItem::general("5A", 5),
                    ClassItem::general("5B", 5),
                ])
                .with_lessons(vec![
                    Lesson::actual("absent", "5A", 1, 3).with_subject("math"),
                    Lesson::actual("hr", "5B", 1, 3),
                    Lesson::stay("stay", 1, 3),
                ]),
        )
    }

    #[test]
    fn test_assign_validates_references() {
        let mut s = session();
        assert!(matches!(
            s.assign("5A", 3, "ghost", "x", ModeKind::Normal),
            Err(AssignError::UnknownTeacher(_))
        ));
        assert!(matches!(
            s.assign("9Z", 3, "free", "x", ModeKind::Normal),
            Err(AssignError::UnknownClass(_))
        ));
        assert!(matches!(
            s.assign("5A", 9, "free", "x", ModeKind::Normal),
            Err(AssignError::InvalidPeriod(9))
        ));
        assert!(s.board.is_empty());
        assert!(s.records().is_empty());
    }

    #[test]
    fn test_assign_auto_registers_absence() {
        // "absent" teaches 5A period 3 with no declared absence. Placing
        // a substitute there registers the partial absence implicitly.
        let mut s = session();
        assert!(!s.ctx.absences.is_absent("absent", 3));

        s.assign("5A", 3, "free", "manual pick", ModeKind::Normal)
            .unwrap();

        assert!(s.ctx.absences.is_absent("absent", 3));
        assert!(!s.ctx.absences.is_absent("absent", 4));
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.records()[0].absent_teacher_id.as_deref(), Some("absent"));
    }

    #[test]
    fn test_unassign_keeps_audit_trail() {
        let mut s = session();
        s.assign("5A", 3, "free", "manual", ModeKind::Normal).unwrap();
        s.unassign("5A", 3, "free").unwrap();
        assert!(s.board.is_empty());
        assert_eq!(s.records().len(), 1);
    }

    #[test]
    fn test_candidates_validates_slot() {
        let s = session();
        assert!(s.candidates("5A", 3).is_ok());
        assert!(matches!(
            s.candidates("9Z", 3),
            Err(AssignError::UnknownClass(_))
        ));
        assert!(matches!(
            s.candidates("5A", 0),
            Err(AssignError::InvalidPeriod(0))
        ));
    }

    #[test]
    fn test_auto_run_and_apply() {
        let mut s = session();
        let mode = ModeConfig::exam_default();
        let batch = s.run_auto(&mode, &[Slot::new("5A", 3)]);
        assert_eq!(batch.proposals.len(), 1);
        assert_eq!(batch.proposals[0].teacher_id, "hr");

        let applied = s.apply(&batch, ModeKind::Exam);
        assert_eq!(applied, 1);
        assert!(s.board.is_assigned("5A", 3, "hr"));
        assert_eq!(s.records()[0].mode, ModeKind::Exam);
    }

    #[test]
    fn test_apply_skips_stale_proposals() {
        let mut s = session();
        let mode = ModeConfig::exam_default();
        let batch = s.run_auto(&mode, &[Slot::new("5A", 3)]);

        // A manual placement lands between preview and apply.
        s.assign("5B", 3, "hr", "manual", ModeKind::Normal).unwrap();

        let applied = s.apply(&batch, ModeKind::Exam);
        assert_eq!(applied, 0);
        // The manual placement is untouched.
        assert!(s.board.is_assigned("5B", 3, "hr"));
        assert!(!s.board.is_assigned("5A", 3, "hr"));
    }

    #[test]
    fn test_seed_stable_per_date() {
        let s = session();
        assert_eq!(s.seed(), s.seed());
        let other = CoverageSession::new(DayContext::new("2026-03-03", 2));
        assert_ne!(s.seed(), other.seed());
    }
}
