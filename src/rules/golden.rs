//! Golden-rule evaluation.
//!
//! Rules are independent predicates: evaluation order does not matter.
//! A violated rule either hard-blocks the candidate (Strict at 100%
//! compliance with a Block action) or applies a score penalty
//! proportional to `(100 - compliance)`. EmergencyOnly rules are
//! skipped outside Emergency mode. Every outcome carries the rule id
//! for audit.

use tracing::debug;

use crate::models::{
    Employee, EnforcementLevel, GoldenRule, ModeConfig, ModeKind, RuleAction, RuleCondition,
    SlotState,
};

/// Per-candidate context a rule predicate evaluates against.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    /// Active mode.
    pub mode: ModeKind,
    /// Candidate's state relative to the target slot.
    pub state: SlotState,
    /// The candidate employee.
    pub employee: &'a Employee,
    /// Slots this employee already covers today.
    pub daily_cover_count: u32,
    /// Whether a documented same-day individual/stay swap exists for
    /// this employee (the stay-protection exception).
    pub has_same_day_swap: bool,
}

/// What a violated rule did to the candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// Candidate removed from the ranked list.
    Blocked,
    /// Score penalty to subtract.
    Penalized(f64),
}

/// One rule's attributable outcome for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    /// The violated rule.
    pub rule_id: String,
    /// The rule's display label.
    pub label: String,
    /// What happened.
    pub outcome: RuleOutcome,
}

/// Composes the effective rule set for a mode.
///
/// Globally-injected defaults apply across all modes; a mode relaxes a
/// global rule by shipping its own copy with the same id, which takes
/// precedence. Mode-local rules are appended after.
pub fn effective_rules(mode: &ModeConfig) -> Vec<GoldenRule> {
    let mut rules: Vec<GoldenRule> = Vec::new();
    for global in [GoldenRule::stay_protection()] {
        match mode.golden_rules.iter().find(|r| r.id == global.id) {
            Some(overridden) => rules.push(overridden.clone()),
            None => rules.push(global),
        }
    }
    for rule in &mode.golden_rules {
        if !rules.iter().any(|r| r.id == rule.id) {
            rules.push(rule.clone());
        }
    }
    rules
}

/// Evaluates every active rule against one candidate.
///
/// Returns only violations; an empty list means the candidate passes
/// clean.
pub fn evaluate_rules(rules: &[GoldenRule], input: &RuleInput<'_>) -> Vec<RuleVerdict> {
    let mut verdicts = Vec::new();
    for rule in rules {
        if !rule.is_active {
            continue;
        }
        if rule.enforcement == EnforcementLevel::EmergencyOnly && input.mode != ModeKind::Emergency
        {
            continue;
        }
        if !violates(&rule.condition, input) {
            continue;
        }

        let outcome = if rule.action == RuleAction::Block
            && rule.enforcement == EnforcementLevel::Strict
            && rule.compliance_percentage == 100
        {
            debug!(rule = %rule.id, employee = %input.employee.id, "candidate blocked");
            RuleOutcome::Blocked
        } else {
            RuleOutcome::Penalized(f64::from(100 - u32::from(rule.compliance_percentage)))
        };

        verdicts.push(RuleVerdict {
            rule_id: rule.id.clone(),
            label: rule.label.clone(),
            outcome,
        });
    }
    verdicts
}

/// Whether any verdict blocks the candidate outright.
pub fn is_blocked(verdicts: &[RuleVerdict]) -> bool {
    verdicts
        .iter()
        .any(|v| v.outcome == RuleOutcome::Blocked)
}

/// Sum of score penalties across verdicts.
pub fn total_penalty(verdicts: &[RuleVerdict]) -> f64 {
    verdicts
        .iter()
        .filter_map(|v| match v.outcome {
            RuleOutcome::Penalized(p) => Some(p),
            RuleOutcome::Blocked => None,
        })
        .sum()
}

fn violates(condition: &RuleCondition, input: &RuleInput<'_>) -> bool {
    match condition {
        RuleCondition::StayProtection => {
            input.state == SlotState::Stay && !input.has_same_day_swap
        }
        RuleCondition::ExternalCandidate => input.employee.is_external,
        RuleCondition::DailyLoadCap(max) => input.daily_cover_count >= *max,
        RuleCondition::UnaccompaniedCover => input.employee.cannot_cover_alone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModeConfig;

    fn input<'a>(employee: &'a Employee, state: SlotState) -> RuleInput<'a> {
        RuleInput {
            mode: ModeKind::Normal,
            state,
            employee,
            daily_cover_count: 0,
            has_same_day_swap: false,
        }
    }

    #[test]
    fn test_stay_protection_blocks() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection()];
        let verdicts = evaluate_rules(&rules, &input(&e, SlotState::Stay));
        assert!(is_blocked(&verdicts));
        assert_eq!(verdicts[0].rule_id, "stay-protection");
    }

    #[test]
    fn test_stay_protection_swap_exception() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection()];
        let mut i = input(&e, SlotState::Stay);
        i.has_same_day_swap = true;
        assert!(evaluate_rules(&rules, &i).is_empty());
    }

    #[test]
    fn test_free_candidate_passes() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection()];
        assert!(evaluate_rules(&rules, &input(&e, SlotState::Free)).is_empty());
    }

    #[test]
    fn test_relaxed_rule_penalizes() {
        // Emergency relaxation: stay-protection at 30% → penalty of 70.
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection()
            .with_compliance(30)
            .with_enforcement(EnforcementLevel::Flexible)
            .with_action(RuleAction::Penalize)];
        let verdicts = evaluate_rules(&rules, &input(&e, SlotState::Stay));
        assert!(!is_blocked(&verdicts));
        assert_eq!(total_penalty(&verdicts), 70.0);
    }

    #[test]
    fn test_strict_below_full_compliance_penalizes() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection().with_compliance(90)];
        let verdicts = evaluate_rules(&rules, &input(&e, SlotState::Stay));
        assert!(!is_blocked(&verdicts));
        assert_eq!(total_penalty(&verdicts), 10.0);
    }

    #[test]
    fn test_inactive_rule_skipped() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::stay_protection().disabled()];
        assert!(evaluate_rules(&rules, &input(&e, SlotState::Stay)).is_empty());
    }

    #[test]
    fn test_emergency_only_skipped_outside_emergency() {
        let e = Employee::substitute("s1");
        let rules = vec![GoldenRule::new("no-ext", RuleCondition::ExternalCandidate)
            .with_enforcement(EnforcementLevel::EmergencyOnly)];
        assert!(evaluate_rules(&rules, &input(&e, SlotState::Free)).is_empty());

        let mut i = input(&e, SlotState::Free);
        i.mode = ModeKind::Emergency;
        let verdicts = evaluate_rules(&rules, &i);
        assert_eq!(verdicts.len(), 1);
    }

    #[test]
    fn test_daily_load_cap() {
        let e = Employee::teacher("t1");
        let rules = vec![GoldenRule::new("cap", RuleCondition::DailyLoadCap(2))
            .with_enforcement(EnforcementLevel::Flexible)
            .with_compliance(80)
            .with_action(RuleAction::Penalize)];

        let mut i = input(&e, SlotState::Free);
        i.daily_cover_count = 1;
        assert!(evaluate_rules(&rules, &i).is_empty());

        i.daily_cover_count = 2;
        let verdicts = evaluate_rules(&rules, &i);
        assert_eq!(total_penalty(&verdicts), 20.0);
    }

    #[test]
    fn test_unaccompanied_cover() {
        let e = Employee::assistant("a1").needs_accompaniment();
        let rules = vec![GoldenRule::new("alone", RuleCondition::UnaccompaniedCover)];
        let verdicts = evaluate_rules(&rules, &input(&e, SlotState::Free));
        assert!(is_blocked(&verdicts));
    }

    #[test]
    fn test_effective_rules_injects_global() {
        let mode = ModeConfig::new(ModeKind::Normal);
        let rules = effective_rules(&mode);
        assert!(rules.iter().any(|r| r.id == "stay-protection"));
    }

    #[test]
    fn test_effective_rules_mode_override_wins() {
        let mode = ModeConfig::emergency_default();
        let rules = effective_rules(&mode);
        let stay = rules.iter().find(|r| r.id == "stay-protection").unwrap();
        assert_eq!(stay.compliance_percentage, 30);
        assert_eq!(
            rules.iter().filter(|r| r.id == "stay-protection").count(),
            1
        );
    }
}
