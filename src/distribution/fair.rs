//! Fair distribution for merged classes.
//!
//! When several sections of the same grade merge for indoor supervision
//! (a rainy day), the sections' own teachers share the merged timetable
//! instead of one teacher absorbing it all. The planner is greedy:
//! slots are walked in period order and each goes to the eligible
//! teacher with the fewest assignments so far. A seeded shuffle of the
//! teacher order varies tie-breaks between days while keeping a given
//! seed reproducible.
//!
//! Hard limits are never relaxed: a teacher is never planned into a
//! period where they teach a non-merged class, never into two sections
//! in the same period, and never outside their working span. The
//! per-teacher load cap is soft and may be relaxed by
//! one when the strict pass leaves slots open; anything still open
//! after that is surfaced as uncovered rather than force-assigned.

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::discovery::DayContext;
use crate::models::{ClassKind, LessonKind, Slot};

/// Per-teacher day facts the planner decides on.
#[derive(Debug, Clone)]
pub struct TeacherProfile {
    /// The teacher.
    pub teacher_id: String,
    /// Teaching lessons today, anywhere.
    pub total_lessons: u32,
    /// Teaching lessons today inside the merged sections.
    pub lessons_in_merged: u32,
    /// Periods committed to non-merged classes. Never planned over.
    pub conflict_periods: BTreeSet<u8>,
    /// Teaches a grade other than the merged one today.
    pub teaches_other_grades: bool,
    /// First period worked today.
    pub first_period: u8,
    /// Last period worked today.
    pub last_period: u8,
}

/// One planned placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAssignment {
    /// Section the teacher supervises.
    pub class_id: String,
    /// Period.
    pub period: u8,
    /// The teacher.
    pub teacher_id: String,
    /// Human-readable reason for the plan entry.
    pub reason: String,
}

/// The complete plan for one merge set.
#[derive(Debug, Clone, Default)]
pub struct FairOutcome {
    /// Planned placements, in slot order.
    pub assignments: Vec<MergeAssignment>,
    /// Slots no eligible teacher could take. Surfaced, never forced.
    pub uncovered: Vec<Slot>,
}

impl FairOutcome {
    /// Planned load of one teacher.
    pub fn load(&self, teacher_id: &str) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .count() as u32
    }

    fn merge(&mut self, other: FairOutcome) {
        self.assignments.extend(other.assignments);
        self.uncovered.extend(other.uncovered);
    }
}

/// Greedy fewest-first planner over a merge set.
#[derive(Debug, Clone)]
pub struct FairDistributor {
    seed: u64,
}

impl Default for FairDistributor {
    fn default() -> Self {
        Self::new()
    }
}

impl FairDistributor {
    /// Creates a planner with the default seed.
    pub fn new() -> Self {
        Self { seed: 0 }
    }

    /// Sets the tie-break shuffle seed. Same seed, same plan.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Plans supervision for the given classes.
    ///
    /// Classes are grouped by grade and kind; only groups of two or more
    /// sections actually merge. A lone section keeps its original
    /// teachers, annotated when a teacher also serves other grades that
    /// day. Unknown class ids are skipped.
    pub fn distribute(&self, ctx: &DayContext, class_ids: &[String]) -> FairOutcome {
        let mut groups: Vec<((u8, ClassKind), Vec<String>)> = Vec::new();
        for id in class_ids {
            let Some(class) = ctx.class(id) else {
                debug!(class = %id, "unknown class skipped in merge set");
                continue;
            };
            let key = class.merge_key();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => {
                    if !members.contains(id) {
                        members.push(id.clone());
                    }
                }
                None => groups.push((key, vec![id.clone()])),
            }
        }

        let mut outcome = FairOutcome::default();
        for ((grade, _), members) in groups {
            if members.len() < 2 {
                outcome.merge(self.keep_original(ctx, grade, &members));
            } else {
                outcome.merge(self.plan_group(ctx, grade, &members));
            }
        }
        outcome
    }

    /// Builds the day profile of every teacher with a teaching lesson in
    /// a merged section.
    pub fn profiles(&self, ctx: &DayContext, grade: u8, members: &[String]) -> Vec<TeacherProfile> {
        let in_merged = |class_id: Option<&str>| {
            class_id.is_some_and(|c| members.iter().any(|m| m == c))
        };

        let mut profiles: Vec<TeacherProfile> = Vec::new();
        for lesson in &ctx.lessons {
            if lesson.day != ctx.day
                || lesson.kind != LessonKind::Actual
                || !in_merged(lesson.class_id.as_deref())
            {
                continue;
            }
            if profiles.iter().any(|p| p.teacher_id == lesson.teacher_id) {
                continue;
            }
            if ctx.absences.is_absent(&lesson.teacher_id, lesson.period)
                || ctx.excluded.contains(&lesson.teacher_id)
            {
                continue;
            }

            let lessons = ctx.lessons_for_teacher(&lesson.teacher_id);
            let teaching: Vec<_> = lessons
                .iter()
                .filter(|l| l.kind == LessonKind::Actual)
                .collect();
            let lessons_in_merged = teaching
                .iter()
                .filter(|l| in_merged(l.class_id.as_deref()))
                .count() as u32;
            let conflict_periods: BTreeSet<u8> = teaching
                .iter()
                .filter(|l| !in_merged(l.class_id.as_deref()))
                .map(|l| l.period)
                .collect();
            let teaches_other_grades = teaching.iter().any(|l| {
                l.class_id
                    .as_deref()
                    .and_then(|c| ctx.class(c))
                    .is_some_and(|c| c.grade_level != grade)
            });
            let Some((first_period, last_period)) = ctx.working_span(&lesson.teacher_id) else {
                continue;
            };

            profiles.push(TeacherProfile {
                teacher_id: lesson.teacher_id.clone(),
                total_lessons: teaching.len() as u32,
                lessons_in_merged,
                conflict_periods,
                teaches_other_grades,
                first_period,
                last_period,
            });
        }
        profiles
    }

    fn plan_group(&self, ctx: &DayContext, grade: u8, members: &[String]) -> FairOutcome {
        let mut profiles = self.profiles(ctx, grade, members);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        profiles.shuffle(&mut rng);

        let mut slots: Vec<Slot> = members
            .iter()
            .flat_map(|class_id| {
                ctx.class_periods(class_id)
                    .into_iter()
                    .map(move |p| Slot::new(class_id.clone(), p))
            })
            .collect();
        // Scarcest slots first: a period only one teacher can take must
        // not wait behind periods everyone can take.
        let supply = |slot: &Slot| {
            profiles
                .iter()
                .filter(|p| {
                    !p.conflict_periods.contains(&slot.period)
                        && slot.period >= p.first_period
                        && slot.period <= p.last_period
                })
                .count()
        };
        slots.sort_by_key(supply);

        let total = slots.len() as u32;
        let soft_cap = if profiles.is_empty() {
            0
        } else {
            total.div_ceil(profiles.len() as u32)
        };

        let mut loads: Vec<u32> = vec![0; profiles.len()];
        let mut taken: Vec<BTreeSet<u8>> = vec![BTreeSet::new(); profiles.len()];
        let mut outcome = FairOutcome::default();

        for slot in slots {
            let pick = self
                .pick(&profiles, &loads, &taken, &slot, soft_cap, 0)
                .or_else(|| {
                    debug!(
                        class = %slot.class_id,
                        period = slot.period,
                        "soft cap relaxed by one for open slot"
                    );
                    self.pick(&profiles, &loads, &taken, &slot, soft_cap, 1)
                });

            match pick {
                Some(idx) => {
                    loads[idx] += 1;
                    taken[idx].insert(slot.period);
                    let profile = &profiles[idx];
                    let mut reason = format!(
                        "merge of {} sections - fair distribution ({}/{})",
                        members.len(),
                        loads[idx],
                        total,
                    );
                    if profile.teaches_other_grades {
                        reason.push_str("; teaches multiple grades today");
                    }
                    outcome.assignments.push(MergeAssignment {
                        class_id: slot.class_id,
                        period: slot.period,
                        teacher_id: profile.teacher_id.clone(),
                        reason,
                    });
                }
                None => {
                    debug!(
                        class = %slot.class_id,
                        period = slot.period,
                        "no eligible supervisor, slot left uncovered"
                    );
                    outcome.uncovered.push(slot);
                }
            }
        }
        outcome
    }

    /// Index of the eligible teacher with the fewest assignments so far.
    ///
    /// `relax` widens only the soft load cap; conflicts, the working
    /// span, and one-section-per-period are absolute.
    fn pick(
        &self,
        profiles: &[TeacherProfile],
        loads: &[u32],
        taken: &[BTreeSet<u8>],
        slot: &Slot,
        soft_cap: u32,
        relax: u32,
    ) -> Option<usize> {
        profiles
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                !p.conflict_periods.contains(&slot.period)
                    && !taken[*i].contains(&slot.period)
                    && slot.period >= p.first_period
                    && slot.period <= p.last_period
                    && loads[*i] < p.lessons_in_merged.min(soft_cap) + relax
            })
            .min_by_key(|(i, _)| loads[*i])
            .map(|(i, _)| i)
    }

    fn keep_original(&self, ctx: &DayContext, grade: u8, members: &[String]) -> FairOutcome {
        let mut outcome = FairOutcome::default();
        for class_id in members {
            for period in ctx.class_periods(class_id) {
                let Some(lesson) = ctx.scheduled_lesson(class_id, period) else {
                    continue;
                };
                if ctx.absences.is_absent(&lesson.teacher_id, period)
                    || ctx.excluded.contains(&lesson.teacher_id)
                {
                    outcome.uncovered.push(Slot::new(class_id.clone(), period));
                    continue;
                }
                let mut reason = "single section, original teacher kept".to_string();
                let spans_other_grades = ctx
                    .lessons_for_teacher(&lesson.teacher_id)
                    .iter()
                    .any(|l| {
                        l.class_id
                            .as_deref()
                            .and_then(|c| ctx.class(c))
                            .is_some_and(|c| c.grade_level != grade)
                    });
                if spans_other_grades {
                    reason.push_str("; teaches multiple grades today");
                }
                outcome.assignments.push(MergeAssignment {
                    class_id: class_id.clone(),
                    period,
                    teacher_id: lesson.teacher_id.clone(),
                    reason,
                });
            }
        }
        outcome
    }
}
