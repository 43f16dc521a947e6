//! Mode configurations: golden rules and priority ladders.
//!
//! A mode bundles the policy for one kind of operating day: which hard
//! constraints apply (golden rules), how eligible candidates are ranked
//! (priority ladder), and the coarse pre-filter toggles (mode settings).
//! Configurations are authored out-of-core and read-only during a run.

use serde::{Deserialize, Serialize};

use super::settings::ModeSettings;
use super::slot::SlotState;

/// Named operating policy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// Exam supervision day.
    Exam,
    /// Field-trip day: some classes are out, their teachers released.
    Trip,
    /// Rainy day: classes may be merged for indoor supervision.
    Rainy,
    /// Emergency staffing: constraints relaxed.
    Emergency,
    /// Holiday/short-day schedule.
    Holiday,
    /// Regular absence coverage.
    Normal,
}

/// How strictly a golden rule is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnforcementLevel {
    /// At 100% compliance, must never be violated by an automatic pick.
    Strict,
    /// Violations allowed but penalized.
    Flexible,
    /// Evaluated only when the active mode is Emergency.
    EmergencyOnly,
    /// Advisory: small penalty, never blocks.
    Soft,
}

/// What happens to a candidate that violates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    /// Remove the candidate from the ranked list.
    Block,
    /// Subtract a score penalty proportional to (100 - compliance).
    Penalize,
}

/// Closed set of evaluatable rule predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleCondition {
    /// The candidate would cover from a protected catch-up period.
    /// Exception: a documented same-day individual/stay swap.
    StayProtection,
    /// The candidate is an external substitute.
    ExternalCandidate,
    /// The candidate already covers at least this many slots today.
    DailyLoadCap(u32),
    /// The candidate may not supervise a class alone.
    UnaccompaniedCover,
}

/// A constraint on which teacher may cover a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenRule {
    /// Stable rule identifier, referenced by audit verdicts.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Inactive rules are skipped entirely.
    pub is_active: bool,
    /// Enforcement strictness, 0-100. 100 = never violate.
    pub compliance_percentage: u8,
    /// Enforcement level.
    pub enforcement: EnforcementLevel,
    /// Applies across all modes unless a mode ships its own copy
    /// (same id) with a relaxed compliance.
    pub is_global: bool,
    /// Consequence of a violation.
    pub action: RuleAction,
    /// The predicate this rule evaluates.
    pub condition: RuleCondition,
}

impl GoldenRule {
    /// Creates an active strict rule at 100% compliance.
    pub fn new(id: impl Into<String>, condition: RuleCondition) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            is_active: true,
            compliance_percentage: 100,
            enforcement: EnforcementLevel::Strict,
            is_global: false,
            action: RuleAction::Block,
            condition,
        }
    }

    /// The globally-injected stay-protection rule: never cover using a
    /// protected catch-up period except under a same-day swap.
    pub fn stay_protection() -> Self {
        let mut r = Self::new("stay-protection", RuleCondition::StayProtection);
        r.label = "Never use a protected catch-up period for coverage".into();
        r.is_global = true;
        r
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the compliance percentage (clamped to 0..=100).
    pub fn with_compliance(mut self, percentage: u8) -> Self {
        self.compliance_percentage = percentage.min(100);
        self
    }

    /// Sets the enforcement level.
    pub fn with_enforcement(mut self, enforcement: EnforcementLevel) -> Self {
        self.enforcement = enforcement;
        self
    }

    /// Sets the violation action.
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    /// Marks the rule as global.
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Deactivates the rule.
    pub fn disabled(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Candidate-to-class relationship a priority step can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassRelationship {
    /// No requirement.
    Any,
    /// Explicitly unrelated to the target class.
    NoRelation,
    /// Teaches or is home-room of a class in the same grade.
    SameGrade,
    /// Home-room teacher of the target class.
    HomeRoom,
    /// Teaches the subject scheduled in the target slot.
    SameSubject,
}

/// Teacher type a priority step can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeacherType {
    /// No requirement.
    Any,
    /// Regular staff only.
    Internal,
    /// External substitutes only.
    External,
}

/// Matching criteria for one priority step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCriteria {
    /// Required relationship to the target class.
    pub relationship: ClassRelationship,
    /// Required teacher type.
    pub teacher_type: TeacherType,
    /// Slot states the step matches. Empty = any state.
    pub slot_states: Vec<SlotState>,
}

impl Default for StepCriteria {
    fn default() -> Self {
        Self {
            relationship: ClassRelationship::Any,
            teacher_type: TeacherType::Any,
            slot_states: Vec::new(),
        }
    }
}

/// One rung of the priority ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityStep {
    /// Position in the ladder, dense 1..N.
    pub order: u32,
    /// Display label.
    pub label: String,
    /// Relative weight within the matched tier. Weights need not sum to 100.
    pub weight_percentage: u32,
    /// Matching criteria.
    pub criteria: StepCriteria,
    /// Disabled steps are skipped entirely.
    pub enabled: bool,
}

impl PriorityStep {
    /// Creates an enabled step.
    pub fn new(order: u32, label: impl Into<String>) -> Self {
        Self {
            order,
            label: label.into(),
            weight_percentage: 50,
            criteria: StepCriteria::default(),
            enabled: true,
        }
    }

    /// Sets the weight percentage.
    pub fn with_weight(mut self, weight_percentage: u32) -> Self {
        self.weight_percentage = weight_percentage;
        self
    }

    /// Requires a class relationship.
    pub fn requiring(mut self, relationship: ClassRelationship) -> Self {
        self.criteria.relationship = relationship;
        self
    }

    /// Requires a teacher type.
    pub fn for_teacher_type(mut self, teacher_type: TeacherType) -> Self {
        self.criteria.teacher_type = teacher_type;
        self
    }

    /// Restricts matching to the given slot states.
    pub fn in_states(mut self, states: impl Into<Vec<SlotState>>) -> Self {
        self.criteria.slot_states = states.into();
        self
    }

    /// Disables the step.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A complete operating policy for one mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Which mode this configures.
    pub kind: ModeKind,
    /// Display label.
    pub label: String,
    /// Periods this mode targets. Empty = all.
    pub affected_periods: Vec<u8>,
    /// Classes this mode targets (merge set for Rainy, outgoing classes
    /// for Trip). Empty = all.
    pub affected_classes: Vec<String>,
    /// Grades this mode targets. Empty = all.
    pub affected_grades: Vec<u8>,
    /// Hard/soft constraints, independent predicates.
    pub golden_rules: Vec<GoldenRule>,
    /// Ordered preference ladder.
    pub priority_steps: Vec<PriorityStep>,
    /// Coarse pre-filter toggles.
    pub settings: ModeSettings,
    /// Calendar event type this mode is linked to, if any.
    pub linked_event: Option<String>,
}

impl ModeConfig {
    /// Creates an empty configuration for a mode.
    pub fn new(kind: ModeKind) -> Self {
        Self {
            kind,
            label: String::new(),
            affected_periods: Vec::new(),
            affected_classes: Vec::new(),
            affected_grades: Vec::new(),
            golden_rules: Vec::new(),
            priority_steps: Vec::new(),
            settings: ModeSettings::default(),
            linked_event: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Adds a golden rule.
    pub fn with_rule(mut self, rule: GoldenRule) -> Self {
        self.golden_rules.push(rule);
        self
    }

    /// Adds a priority step.
    pub fn with_step(mut self, step: PriorityStep) -> Self {
        self.priority_steps.push(step);
        self
    }

    /// Sets the mode settings.
    pub fn with_settings(mut self, settings: ModeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Restricts the mode to specific classes.
    pub fn with_classes(mut self, class_ids: Vec<String>) -> Self {
        self.affected_classes = class_ids;
        self
    }

    /// Restricts the mode to specific periods.
    pub fn with_periods(mut self, periods: Vec<u8>) -> Self {
        self.affected_periods = periods;
        self
    }

    /// Links the mode to a calendar event type.
    pub fn with_linked_event(mut self, event: impl Into<String>) -> Self {
        self.linked_event = Some(event.into());
        self
    }

    /// Whether a rule set (rules or ladder) is linked to this mode.
    /// Without one the orchestrator falls back to the legacy precedence.
    pub fn has_rule_set(&self) -> bool {
        !self.golden_rules.is_empty() || !self.priority_steps.is_empty()
    }

    /// Whether `priority_steps` orders form a dense 1..N sequence.
    pub fn ladder_is_dense(&self) -> bool {
        let mut orders: Vec<u32> = self.priority_steps.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        orders
            .iter()
            .enumerate()
            .all(|(i, &o)| o == (i as u32) + 1)
    }

    /// Default exam configuration.
    ///
    /// Ladder: home-room teacher of the target class > teacher released
    /// via a documented swap > same-subject teacher > any free teacher >
    /// a teacher whose only available period is an individual one.
    pub fn exam_default() -> Self {
        Self::new(ModeKind::Exam)
            .with_label("Exam supervision")
            .with_linked_event("exam")
            .with_rule(GoldenRule::stay_protection())
            .with_step(
                PriorityStep::new(1, "Home-room teacher of the class")
                    .with_weight(100)
                    .requiring(ClassRelationship::HomeRoom),
            )
            .with_step(
                PriorityStep::new(2, "Released by a documented swap")
                    .with_weight(90)
                    .in_states(vec![SlotState::Released, SlotState::ReleasedByTrip]),
            )
            .with_step(
                PriorityStep::new(3, "Teaches the exam subject")
                    .with_weight(80)
                    .requiring(ClassRelationship::SameSubject)
                    .in_states(vec![SlotState::Free]),
            )
            .with_step(
                PriorityStep::new(4, "Free this period")
                    .with_weight(60)
                    .in_states(vec![SlotState::Free]),
            )
            .with_step(
                PriorityStep::new(5, "Individual period, convertible")
                    .with_weight(40)
                    .in_states(vec![SlotState::Individual]),
            )
    }

    /// Default normal-day coverage configuration.
    pub fn normal_default() -> Self {
        Self::new(ModeKind::Normal)
            .with_label("Absence coverage")
            .with_rule(GoldenRule::stay_protection())
            .with_step(
                PriorityStep::new(1, "Home-room teacher of the class")
                    .with_weight(100)
                    .requiring(ClassRelationship::HomeRoom),
            )
            .with_step(
                PriorityStep::new(2, "Free teacher of the same grade")
                    .with_weight(80)
                    .requiring(ClassRelationship::SameGrade)
                    .in_states(vec![SlotState::Free]),
            )
            .with_step(
                PriorityStep::new(3, "Any free teacher")
                    .with_weight(60)
                    .in_states(vec![SlotState::Free]),
            )
            .with_step(
                PriorityStep::new(4, "Individual period, convertible")
                    .with_weight(40)
                    .in_states(vec![SlotState::Individual]),
            )
    }

    /// Default emergency configuration.
    ///
    /// Relaxes the global stay-protection rule to 30% compliance:
    /// stay periods become penalized rather than blocked.
    pub fn emergency_default() -> Self {
        let mut base = Self::normal_default();
        base.kind = ModeKind::Emergency;
        base.label = "Emergency staffing".into();
        base.golden_rules = vec![GoldenRule::stay_protection()
            .with_compliance(30)
            .with_enforcement(EnforcementLevel::Flexible)
            .with_action(RuleAction::Penalize)];
        base.priority_steps.push(
            PriorityStep::new(5, "Catch-up period, emergency use")
                .with_weight(20)
                .in_states(vec![SlotState::Stay]),
        );
        base
    }

    /// Default rainy-day configuration. Merge set is supplied per run
    /// via `with_classes`.
    pub fn rainy_default() -> Self {
        Self::new(ModeKind::Rainy)
            .with_label("Rainy-day supervision")
            .with_linked_event("rainy")
    }

    /// Default trip configuration. Outgoing classes are supplied per run
    /// via `with_classes`.
    pub fn trip_default() -> Self {
        Self::new(ModeKind::Trip)
            .with_label("Field trip")
            .with_linked_event("trip")
            .with_rule(GoldenRule::stay_protection())
            .with_step(
                PriorityStep::new(1, "Released by the trip")
                    .with_weight(100)
                    .in_states(vec![SlotState::ReleasedByTrip, SlotState::Released]),
            )
            .with_step(
                PriorityStep::new(2, "Any free teacher")
                    .with_weight(60)
                    .in_states(vec![SlotState::Free]),
            )
    }

    /// Default holiday configuration: normal ladder on a reduced day.
    pub fn holiday_default() -> Self {
        let mut base = Self::normal_default();
        base.kind = ModeKind::Holiday;
        base.label = "Holiday schedule".into();
        base.linked_event = Some("holiday".into());
        base
    }
}
