//! The distribution orchestrator: one batch pass per mode.
//!
//! Given a day context, an assignment board, and target slots, the
//! orchestrator produces a batch of proposals without touching the
//! board. Applying a batch is the session's job, so a run is a pure
//! function of its inputs and can be re-previewed freely.
//!
//! Mode dispatch:
//! - **Trip** runs in two phases. The first run returns ranked
//!   companion candidates and no proposals; once the operator confirms
//!   a companion set, a second run excludes the travellers and covers
//!   the remaining slots with released teachers first.
//! - **Rainy** with a merge set of two or more classes delegates to the
//!   fair distributor.
//! - Every other mode resolves slot by slot: discovery, settings
//!   pre-filter, golden rules, then ladder scoring. A mode without a
//!   linked rule set falls back to the fixed legacy precedence.

use std::collections::HashSet;

use tracing::debug;

use crate::discovery::{discover, Candidate, DayContext};
use crate::models::{AssignmentBoard, LessonKind, ModeConfig, ModeKind, Slot, SlotState};
use crate::rules::{
    effective_rules, evaluate_rules, is_blocked, prefilter, score_candidate, total_penalty,
    MatchFacts, RuleInput, RuleVerdict, ScoreBreakdown,
};

use super::fair::FairDistributor;

/// One proposed placement. Nothing is written until the session applies
/// the batch.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// Target slot.
    pub slot: Slot,
    /// Proposed teacher.
    pub teacher_id: String,
    /// Why this teacher: the matched step's label, or the legacy badge.
    pub reason: String,
    /// Full score attribution. `None` on the legacy and fair paths.
    pub breakdown: Option<ScoreBreakdown>,
}

/// Audit record for one slot's resolution.
#[derive(Debug, Clone)]
pub struct SlotTrace {
    /// The slot.
    pub slot: Slot,
    /// Candidates that survived the pre-filter.
    pub considered: usize,
    /// Candidates removed by a blocking rule, with their verdicts.
    pub blocked: Vec<(String, Vec<RuleVerdict>)>,
    /// Whether the slot ended up with a proposal (or was already covered).
    pub resolved: bool,
}

/// A teacher who could accompany a trip, ranked by how many of their
/// lessons the trip releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionCandidate {
    /// The teacher.
    pub teacher_id: String,
    /// Teaching lessons in the outgoing classes today.
    pub lesson_count: u32,
}

/// Result of one orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct DistributionBatch {
    /// Proposed placements, in target order.
    pub proposals: Vec<Proposal>,
    /// Slots with no automatic candidate. Surfaced, never forced.
    pub open_slots: Vec<Slot>,
    /// Ranked companion candidates (trip mode only).
    pub companions: Vec<CompanionCandidate>,
    /// Per-slot audit traces.
    pub traces: Vec<SlotTrace>,
}

/// Drives one distribution pass for a mode.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    ctx: &'a DayContext,
    mode: &'a ModeConfig,
    seed: u64,
    confirmed_companions: Option<Vec<String>>,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator over a day context and mode policy.
    pub fn new(ctx: &'a DayContext, mode: &'a ModeConfig) -> Self {
        Self {
            ctx,
            mode,
            seed: 0,
            confirmed_companions: None,
        }
    }

    /// Sets the tie-break seed forwarded to the fair distributor.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Confirms the companion set for a trip run.
    pub fn with_companions<I, S>(mut self, companions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.confirmed_companions = Some(companions.into_iter().map(Into::into).collect());
        self
    }

    /// Runs one batch pass.
    pub fn run(&self, board: &AssignmentBoard, targets: &[Slot]) -> DistributionBatch {
        match self.mode.kind {
            ModeKind::Trip => self.run_trip(board, targets),
            ModeKind::Rainy if self.mode.affected_classes.len() >= 2 => self.run_rainy(),
            _ => self.run_slots(self.ctx, board, targets),
        }
    }

    /// Ranks trip companion candidates.
    ///
    /// Home-room teachers of the outgoing classes travel by default and
    /// are not listed. Everyone else is ranked by how many of their
    /// lessons the trip releases, most first.
    pub fn rank_trip_companions(&self) -> Vec<CompanionCandidate> {
        let outgoing: HashSet<&str> = self
            .mode
            .affected_classes
            .iter()
            .map(String::as_str)
            .collect();

        let mut candidates: Vec<CompanionCandidate> = self
            .ctx
            .roster
            .iter()
            .filter(|e| !self.ctx.excluded.contains(&e.id))
            .filter(|e| {
                !e.home_room_class
                    .as_deref()
                    .is_some_and(|c| outgoing.contains(c))
            })
            .filter_map(|e| {
                let lesson_count = self
                    .ctx
                    .lessons_for_teacher(&e.id)
                    .iter()
                    .filter(|l| {
                        l.kind == LessonKind::Actual
                            && l.class_id.as_deref().is_some_and(|c| outgoing.contains(c))
                    })
                    .count() as u32;
                (lesson_count > 0).then(|| CompanionCandidate {
                    teacher_id: e.id.clone(),
                    lesson_count,
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.lesson_count.cmp(&a.lesson_count));
        candidates
    }

    fn run_trip(&self, board: &AssignmentBoard, targets: &[Slot]) -> DistributionBatch {
        let companions = self.rank_trip_companions();

        let Some(confirmed) = &self.confirmed_companions else {
            // Phase one: nothing is assigned until the operator confirms
            // who travels.
            debug!("trip run awaiting companion confirmation");
            return DistributionBatch {
                companions,
                open_slots: targets.to_vec(),
                ..Default::default()
            };
        };

        let mut ctx = self.ctx.clone();
        for companion in confirmed {
            ctx.excluded.insert(companion.clone());
        }
        for class_id in &self.mode.affected_classes {
            ctx.excused_classes.insert(class_id.clone());
            // Home-room teachers travel with their class.
            for e in &self.ctx.roster {
                if e.is_home_room_of(class_id) {
                    ctx.excluded.insert(e.id.clone());
                }
            }
        }

        let mut batch = self.run_slots(&ctx, board, targets);
        batch.companions = companions;
        batch
    }

    fn run_rainy(&self) -> DistributionBatch {
        let outcome = FairDistributor::new()
            .with_seed(self.seed)
            .distribute(self.ctx, &self.mode.affected_classes);

        DistributionBatch {
            proposals: outcome
                .assignments
                .into_iter()
                .map(|a| Proposal {
                    slot: Slot::new(a.class_id, a.period),
                    teacher_id: a.teacher_id,
                    reason: a.reason,
                    breakdown: None,
                })
                .collect(),
            open_slots: outcome.uncovered,
            ..Default::default()
        }
    }

    fn run_slots(
        &self,
        ctx: &DayContext,
        board: &AssignmentBoard,
        targets: &[Slot],
    ) -> DistributionBatch {
        let mut batch = DistributionBatch::default();
        // Teachers claimed by earlier proposals in this batch, per period.
        let mut claimed: HashSet<(u8, String)> = HashSet::new();

        for slot in targets {
            if !board.entries(&slot.class_id, slot.period).is_empty() {
                // Already covered; re-running must not stack a second
                // teacher on top.
                debug!(class = %slot.class_id, period = slot.period, "slot already covered");
                batch.traces.push(SlotTrace {
                    slot: slot.clone(),
                    considered: 0,
                    blocked: Vec::new(),
                    resolved: true,
                });
                continue;
            }

            let (ranked, blocked) = if self.mode.has_rule_set() {
                self.pipeline_rank(ctx, board, slot)
            } else {
                (self.legacy_rank(ctx, board, slot), Vec::new())
            };

            let considered = ranked.len();
            let pick = ranked.into_iter().find(|(c, _, _)| {
                !claimed.contains(&(slot.period, c.employee_id.clone()))
            });

            let resolved = match pick {
                Some((candidate, breakdown, reason)) => {
                    claimed.insert((slot.period, candidate.employee_id.clone()));
                    batch.proposals.push(Proposal {
                        slot: slot.clone(),
                        teacher_id: candidate.employee_id,
                        reason,
                        breakdown,
                    });
                    true
                }
                None => {
                    debug!(
                        class = %slot.class_id,
                        period = slot.period,
                        considered,
                        "no automatic candidate, slot left open"
                    );
                    batch.open_slots.push(slot.clone());
                    false
                }
            };

            batch.traces.push(SlotTrace {
                slot: slot.clone(),
                considered,
                blocked,
                resolved,
            });
        }
        batch
    }

    /// Full pipeline ranking: pre-filter, golden rules, ladder.
    #[allow(clippy::type_complexity)]
    fn pipeline_rank(
        &self,
        ctx: &DayContext,
        board: &AssignmentBoard,
        slot: &Slot,
    ) -> (
        Vec<(Candidate, Option<ScoreBreakdown>, String)>,
        Vec<(String, Vec<RuleVerdict>)>,
    ) {
        let buckets = discover(ctx, board, slot);
        let candidates: Vec<Candidate> = buckets.rankable().into_iter().cloned().collect();
        let candidates = prefilter(&self.mode.settings, ctx, board, slot, candidates);

        let rules = effective_rules(self.mode);
        let grade = ctx.class(&slot.class_id).map(|c| c.grade_level);
        let subject = ctx
            .scheduled_lesson(&slot.class_id, slot.period)
            .and_then(|l| l.subject.clone());

        let mut blocked = Vec::new();
        let mut scored: Vec<(Candidate, Option<ScoreBreakdown>, String)> = Vec::new();

        for candidate in candidates {
            let Some(employee) = ctx.employee(&candidate.employee_id) else {
                continue;
            };
            let input = RuleInput {
                mode: self.mode.kind,
                state: candidate.state,
                employee,
                daily_cover_count: board.cover_count(&employee.id),
                has_same_day_swap: ctx.has_individual_today(&employee.id)
                    || ctx.swap_released.contains(&employee.id),
            };
            let verdicts = evaluate_rules(&rules, &input);
            if is_blocked(&verdicts) {
                blocked.push((candidate.employee_id.clone(), verdicts));
                continue;
            }

            let facts = MatchFacts {
                state: candidate.state,
                is_home_room: candidate.is_home_room,
                same_grade: grade.is_some_and(|g| ctx.teaches_grade(&candidate.employee_id, g)),
                same_subject: subject.as_deref().is_some_and(|s| employee.teaches(s)),
                is_external: employee.is_external,
            };
            let breakdown =
                score_candidate(&self.mode.priority_steps, &facts, total_penalty(&verdicts));
            if breakdown.primary_order.is_none() {
                // Matched no step: selectable manually, never proposed.
                continue;
            }
            let reason = breakdown
                .entries
                .first()
                .map(|e| e.label.clone())
                .unwrap_or_else(|| candidate.label.clone());
            scored.push((candidate, Some(breakdown), reason));
        }

        // Stable: equal totals keep bucket order (pool, home-room, general).
        scored.sort_by(|a, b| {
            let ta = a.1.as_ref().map(|x| x.total).unwrap_or(0.0);
            let tb = b.1.as_ref().map(|x| x.total).unwrap_or(0.0);
            tb.partial_cmp(&ta).unwrap_or(std::cmp::Ordering::Equal)
        });
        (scored, blocked)
    }

    /// Fixed precedence for modes without a linked rule set: home-room,
    /// then the slot's own regular teacher, released, free, individual.
    /// Stay periods are never drawn on.
    fn legacy_rank(
        &self,
        ctx: &DayContext,
        board: &AssignmentBoard,
        slot: &Slot,
    ) -> Vec<(Candidate, Option<ScoreBreakdown>, String)> {
        let buckets = discover(ctx, board, slot);
        let mut candidates: Vec<Candidate> = buckets
            .rankable()
            .into_iter()
            .filter(|c| c.state != SlotState::Stay)
            .cloned()
            .collect();
        let rank = |state: SlotState| match state {
            SlotState::Released => 0,
            SlotState::ReleasedByTrip => 1,
            SlotState::Actual => 2,
            SlotState::Free => 3,
            _ => 4,
        };
        candidates.sort_by_key(|c| (!c.is_home_room, rank(c.state)));
        candidates
            .into_iter()
            .map(|c| {
                let reason = c.label.clone();
                (c, None, reason)
            })
            .collect()
    }
}
