//! Mode-settings pre-filter.
//!
//! Cheap, order-independent candidate removal applied before golden-rule
//! and ladder evaluation. The effect is identical to shrinking the
//! discovery output, so the rule machinery never evaluates a candidate
//! the settings already forbid.

use crate::discovery::{Candidate, DayContext};
use crate::models::{AssignmentBoard, ClassKind, ModeSettings, Slot, SlotState};

/// Removes candidates the mode settings forbid.
///
/// Keeps discovery order for the survivors.
pub fn prefilter(
    settings: &ModeSettings,
    ctx: &DayContext,
    board: &AssignmentBoard,
    target: &Slot,
    candidates: Vec<Candidate>,
) -> Vec<Candidate> {
    let target_subject = ctx
        .scheduled_lesson(&target.class_id, target.period)
        .and_then(|l| l.subject.clone());

    candidates
        .into_iter()
        .filter(|c| {
            let Some(employee) = ctx.employee(&c.employee_id) else {
                return false;
            };

            if !settings.teacher.allow_external && employee.is_external {
                return false;
            }
            if !settings.teacher.allow_unaccompanied && employee.cannot_cover_alone {
                return false;
            }
            if !settings.teacher.include_off_duty
                && ctx.lessons_for_teacher(&employee.id).is_empty()
            {
                return false;
            }
            if !settings.lesson.allow_stay_cover && c.state == SlotState::Stay {
                return false;
            }
            if !settings.lesson.allow_individual_cover && c.state == SlotState::Individual {
                return false;
            }
            if settings.time.respect_working_hours {
                match ctx.working_span(&employee.id) {
                    Some((first, last)) if target.period >= first && target.period <= last => {}
                    _ => return false,
                }
            }
            if !settings.class.include_special_staff {
                let home_special = employee
                    .home_room_class
                    .as_deref()
                    .and_then(|id| ctx.class(id))
                    .is_some_and(|cl| cl.kind == ClassKind::Special);
                if home_special {
                    return false;
                }
            }
            if settings.subject.require_subject_match {
                if let Some(subject) = &target_subject {
                    if !employee.teaches(subject) {
                        return false;
                    }
                }
            }
            if let Some(cap) = settings.staffing.daily_cover_cap {
                if board.cover_count(&employee.id) >= cap {
                    return false;
                }
            }
            true
        })
        .collect()
}
