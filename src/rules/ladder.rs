//! Priority-ladder scoring.
//!
//! Walks the mode's steps in ascending order as a pure fold: the first
//! matching enabled step sets the candidate's primary tier (tier points
//! dominate any weight sum), later matching steps add their weight as
//! tie-break bonuses. The result is an immutable breakdown listing every
//! contribution, so a ranking is always explainable.
//!
//! Candidates matching no step score zero and are never proposed
//! automatically; they remain selectable via manual override.

use crate::models::{ClassRelationship, PriorityStep, SlotState, TeacherType};

/// Tier spacing. One tier outweighs any achievable sum of weight bonuses
/// and penalties beneath it.
const TIER_BASE: f64 = 1000.0;

/// Precomputed relationship facts for one candidate against one slot.
#[derive(Debug, Clone, Copy)]
pub struct MatchFacts {
    /// Candidate's state relative to the slot.
    pub state: SlotState,
    /// Home-room teacher of the target class.
    pub is_home_room: bool,
    /// Teaches or is home-room of a class in the target's grade.
    pub same_grade: bool,
    /// Teaches the subject scheduled in the target slot.
    pub same_subject: bool,
    /// External substitute.
    pub is_external: bool,
}

/// One score contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    /// The contributing step's order.
    pub order: u32,
    /// The step's label.
    pub label: String,
    /// Points contributed.
    pub points: f64,
}

/// A candidate's full score, with attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Contributions in step order.
    pub entries: Vec<ScoreEntry>,
    /// Golden-rule penalty subtracted from the total.
    pub penalty: f64,
    /// Final score. Zero when no step matched.
    pub total: f64,
    /// Order of the step that set the primary tier, if any.
    pub primary_order: Option<u32>,
}

impl ScoreBreakdown {
    /// A zero score (no step matched).
    pub fn unmatched() -> Self {
        Self {
            entries: Vec::new(),
            penalty: 0.0,
            total: 0.0,
            primary_order: None,
        }
    }
}

/// Whether a step's criteria accept the given facts.
pub fn step_matches(step: &PriorityStep, facts: &MatchFacts) -> bool {
    if !step.enabled {
        return false;
    }
    let relationship_ok = match step.criteria.relationship {
        ClassRelationship::Any => true,
        ClassRelationship::NoRelation => {
            !facts.is_home_room && !facts.same_grade && !facts.same_subject
        }
        ClassRelationship::SameGrade => facts.same_grade,
        ClassRelationship::HomeRoom => facts.is_home_room,
        ClassRelationship::SameSubject => facts.same_subject,
    };
    if !relationship_ok {
        return false;
    }
    let type_ok = match step.criteria.teacher_type {
        TeacherType::Any => true,
        TeacherType::Internal => !facts.is_external,
        TeacherType::External => facts.is_external,
    };
    if !type_ok {
        return false;
    }
    step.criteria.slot_states.is_empty() || step.criteria.slot_states.contains(&facts.state)
}

/// Scores one candidate against a ladder.
///
/// `penalty` is the accumulated golden-rule penalty for this candidate;
/// it is subtracted only when at least one step matched (an unmatched
/// candidate stays at exactly zero).
pub fn score_candidate(
    steps: &[PriorityStep],
    facts: &MatchFacts,
    penalty: f64,
) -> ScoreBreakdown {
    let mut ordered: Vec<&PriorityStep> = steps.iter().collect();
    ordered.sort_by_key(|s| s.order);
    let max_order = ordered.iter().map(|s| s.order).max().unwrap_or(0);

    let mut entries = Vec::new();
    let mut primary_order = None;

    for step in ordered {
        if !step_matches(step, facts) {
            continue;
        }
        let points = if primary_order.is_none() {
            primary_order = Some(step.order);
            f64::from(max_order + 1 - step.order) * TIER_BASE + f64::from(step.weight_percentage)
        } else {
            f64::from(step.weight_percentage)
        };
        entries.push(ScoreEntry {
            order: step.order,
            label: step.label.clone(),
            points,
        });
    }

    if entries.is_empty() {
        return ScoreBreakdown::unmatched();
    }

    let raw: f64 = entries.iter().map(|e| e.points).sum();
    ScoreBreakdown {
        entries,
        penalty,
        total: raw - penalty,
        primary_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModeConfig;

    fn facts(state: SlotState) -> MatchFacts {
        MatchFacts {
            state,
            is_home_room: false,
            same_grade: false,
            same_subject: false,
            is_external: false,
        }
    }

    #[test]
    fn test_exam_ladder_tiers() {
        // Exam precedence: home-room > released swap > same subject >
        // free > individual.
        let ladder = ModeConfig::exam_default().priority_steps;

        let mut home_room = facts(SlotState::Actual);
        home_room.is_home_room = true;
        let released = facts(SlotState::Released);
        let mut same_subject = facts(SlotState::Free);
        same_subject.same_subject = true;
        let free = facts(SlotState::Free);
        let individual = facts(SlotState::Individual);

        let scores: Vec<f64> = [home_room, released, same_subject, free, individual]
            .iter()
            .map(|f| score_candidate(&ladder, f, 0.0).total)
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[0] > pair[1], "ladder order broken: {scores:?}");
        }
    }

    #[test]
    fn test_first_match_sets_primary_tier() {
        let ladder = ModeConfig::exam_default().priority_steps;
        let mut f = facts(SlotState::Free);
        f.is_home_room = true;

        let b = score_candidate(&ladder, &f, 0.0);
        assert_eq!(b.primary_order, Some(1));
        // Home-room (any state) also matches the free-teacher step as a
        // bonus entry.
        assert!(b.entries.len() >= 2);
    }

    #[test]
    fn test_unmatched_scores_zero() {
        let ladder = ModeConfig::exam_default().priority_steps;
        let b = score_candidate(&ladder, &facts(SlotState::Stay), 0.0);
        assert_eq!(b.total, 0.0);
        assert!(b.entries.is_empty());
        assert_eq!(b.primary_order, None);
    }

    #[test]
    fn test_penalty_subtracted_but_not_from_unmatched() {
        let ladder = ModeConfig::exam_default().priority_steps;
        let with = score_candidate(&ladder, &facts(SlotState::Free), 70.0);
        let without = score_candidate(&ladder, &facts(SlotState::Free), 0.0);
        assert_eq!(without.total - with.total, 70.0);

        let unmatched = score_candidate(&ladder, &facts(SlotState::Stay), 70.0);
        assert_eq!(unmatched.total, 0.0);
    }

    #[test]
    fn test_penalty_cannot_jump_tiers() {
        // A penalized free teacher still outranks an unpenalized
        // individual-period teacher one tier down.
        let ladder = ModeConfig::exam_default().priority_steps;
        let penalized_free = score_candidate(&ladder, &facts(SlotState::Free), 99.0);
        let individual = score_candidate(&ladder, &facts(SlotState::Individual), 0.0);
        assert!(penalized_free.total > individual.total);
    }

    #[test]
    fn test_disabled_step_skipped() {
        use crate::models::PriorityStep;
        let steps = vec![
            PriorityStep::new(1, "off")
                .with_weight(100)
                .in_states(vec![SlotState::Free])
                .disabled(),
            PriorityStep::new(2, "on")
                .with_weight(50)
                .in_states(vec![SlotState::Free]),
        ];
        let b = score_candidate(&steps, &facts(SlotState::Free), 0.0);
        assert_eq!(b.primary_order, Some(2));
        assert_eq!(b.entries.len(), 1);
    }

    #[test]
    fn test_teacher_type_criteria() {
        use crate::models::{PriorityStep, TeacherType};
        let steps = vec![PriorityStep::new(1, "internal only")
            .with_weight(50)
            .for_teacher_type(TeacherType::Internal)
            .in_states(vec![SlotState::Free])];

        let internal = facts(SlotState::Free);
        let mut external = facts(SlotState::Free);
        external.is_external = true;

        assert!(score_candidate(&steps, &internal, 0.0).total > 0.0);
        assert_eq!(score_candidate(&steps, &external, 0.0).total, 0.0);
    }

    #[test]
    fn test_no_relation_criteria() {
        use crate::models::{ClassRelationship, PriorityStep};
        let steps = vec![PriorityStep::new(1, "unrelated")
            .with_weight(50)
            .requiring(ClassRelationship::NoRelation)];

        let unrelated = facts(SlotState::Free);
        let mut related = facts(SlotState::Free);
        related.same_grade = true;

        assert!(score_candidate(&steps, &unrelated, 0.0).total > 0.0);
        assert_eq!(score_candidate(&steps, &related, 0.0).total, 0.0);
    }
}
