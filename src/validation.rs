//! Input validation for day snapshots and mode configurations.
//!
//! Checks structural integrity before a session opens. Detects:
//! - Duplicate IDs
//! - Dangling teacher/class references in the timetable
//! - Broken home-room links
//! - Teachers double-booked in the weekly timetable
//! - Malformed priority ladders

use std::collections::{HashMap, HashSet};

use crate::models::{ClassItem, Employee, Lesson, LessonKind, ModeConfig};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A lesson references a teacher that doesn't exist.
    InvalidTeacherReference,
    /// A lesson references a class that doesn't exist.
    InvalidClassReference,
    /// An employee's home-room link points at a missing class.
    BrokenHomeRoomLink,
    /// A teacher holds two teaching lessons in the same day and period.
    LessonOverlap,
    /// A lesson sits outside the 1-based period range.
    InvalidPeriod,
    /// A priority ladder's orders are not a dense 1..N sequence.
    NonDenseLadder,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a day snapshot's inputs.
///
/// Checks:
/// 1. No duplicate employee IDs
/// 2. No duplicate class IDs
/// 3. All lesson teacher references point to existing employees
/// 4. All lesson class references point to existing classes
/// 5. All home-room links point to existing classes
/// 6. No teacher holds two teaching lessons in one (day, period)
/// 7. All lesson periods are 1-based and inside the day
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(
    roster: &[Employee],
    classes: &[ClassItem],
    lessons: &[Lesson],
    period_count: u8,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut employee_ids = HashSet::new();
    for e in roster {
        if !employee_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }
    }

    let mut class_ids = HashSet::new();
    for c in classes {
        if !class_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate class ID: {}", c.id),
            ));
        }
    }

    for e in roster {
        if let Some(home) = e.home_room_class.as_deref() {
            if !class_ids.contains(home) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::BrokenHomeRoomLink,
                    format!("Employee '{}' is home-room of unknown class '{home}'", e.id),
                ));
            }
        }
    }

    for l in lessons {
        if !employee_ids.contains(l.teacher_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTeacherReference,
                format!(
                    "Lesson (day {}, period {}) references unknown teacher '{}'",
                    l.day, l.period, l.teacher_id
                ),
            ));
        }
        if let Some(class_id) = l.class_id.as_deref() {
            if !class_ids.contains(class_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidClassReference,
                    format!(
                        "Lesson (day {}, period {}) references unknown class '{class_id}'",
                        l.day, l.period
                    ),
                ));
            }
        }
        if l.period < 1 || l.period > period_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriod,
                format!(
                    "Lesson of '{}' sits at period {} outside 1..={period_count}",
                    l.teacher_id, l.period
                ),
            ));
        }
    }

    // One teaching lesson per teacher per (day, period). Stay and duty
    // slots may legitimately coexist with bookkeeping entries.
    let mut seen: HashMap<(&str, u8, u8), u32> = HashMap::new();
    for l in lessons.iter().filter(|l| l.kind == LessonKind::Actual) {
        *seen.entry((l.teacher_id.as_str(), l.day, l.period)).or_default() += 1;
    }
    for ((teacher_id, day, period), count) in seen {
        if count > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::LessonOverlap,
                format!("Teacher '{teacher_id}' holds {count} lessons on day {day}, period {period}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a mode configuration.
///
/// Checks:
/// 1. Golden-rule IDs are unique within the mode
/// 2. A non-empty priority ladder has dense orders 1..N
pub fn validate_mode(mode: &ModeConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut rule_ids = HashSet::new();
    for rule in &mode.golden_rules {
        if !rule_ids.insert(rule.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate golden-rule ID: {}", rule.id),
            ));
        }
    }

    if !mode.priority_steps.is_empty() && !mode.ladder_is_dense() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonDenseLadder,
            "Priority ladder orders must form a dense 1..N sequence".to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModeKind, PriorityStep};

    fn sample_roster() -> Vec<Employee> {
        vec![
            Employee::teacher("t1").with_home_room("5A"),
            Employee::teacher("t2"),
        ]
    }

    fn sample_classes() -> Vec<ClassItem> {
        vec![ClassItem::general("5A", 5), ClassItem::general("5B", 5)]
    }

    fn sample_lessons() -> Vec<Lesson> {
        vec![
            Lesson::actual("t1", "5A", 1, 1),
            Lesson::actual("t2", "5B", 1, 1),
            Lesson::stay("t1", 1, 2),
        ]
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(validate_snapshot(&sample_roster(), &sample_classes(), &sample_lessons(), 8).is_ok());
    }

    #[test]
    fn test_duplicate_employee_id() {
        let roster = vec![Employee::teacher("t1"), Employee::teacher("t1")];
        let errors = validate_snapshot(&roster, &sample_classes(), &[], 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("employee")));
    }

    #[test]
    fn test_duplicate_class_id() {
        let classes = vec![ClassItem::general("5A", 5), ClassItem::general("5A", 5)];
        let errors = validate_snapshot(&sample_roster(), &classes, &[], 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("class")));
    }

    #[test]
    fn test_unknown_teacher_in_lesson() {
        let lessons = vec![Lesson::actual("ghost", "5A", 1, 1)];
        let errors = validate_snapshot(&sample_roster(), &sample_classes(), &lessons, 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTeacherReference));
    }

    #[test]
    fn test_unknown_class_in_lesson() {
        let lessons = vec![Lesson::actual("t1", "9Z", 1, 1)];
        let errors = validate_snapshot(&sample_roster(), &sample_classes(), &lessons, 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidClassReference));
    }

    #[test]
    fn test_broken_home_room_link() {
        let roster = vec![Employee::teacher("t1").with_home_room("9Z")];
        let errors = validate_snapshot(&roster, &sample_classes(), &[], 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::BrokenHomeRoomLink));
    }

    #[test]
    fn test_double_booked_teacher() {
        let lessons = vec![
            Lesson::actual("t1", "5A", 1, 1),
            Lesson::actual("t1", "5B", 1, 1),
        ];
        let errors = validate_snapshot(&sample_roster(), &sample_classes(), &lessons, 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::LessonOverlap));
    }

    #[test]
    fn test_period_out_of_range() {
        let lessons = vec![Lesson::actual("t1", "5A", 1, 9)];
        let errors = validate_snapshot(&sample_roster(), &sample_classes(), &lessons, 8).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidPeriod));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let roster = vec![Employee::teacher("t1").with_home_room("9Z")];
        let lessons = vec![Lesson::actual("ghost", "9Y", 1, 0)];
        let errors = validate_snapshot(&roster, &sample_classes(), &lessons, 8).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_valid_mode() {
        assert!(validate_mode(&ModeConfig::exam_default()).is_ok());
    }

    #[test]
    fn test_non_dense_ladder_rejected() {
        let mode = ModeConfig::new(ModeKind::Normal)
            .with_step(PriorityStep::new(1, "a"))
            .with_step(PriorityStep::new(4, "b"));
        let errors = validate_mode(&mode).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonDenseLadder));
    }

    #[test]
    fn test_duplicate_rule_id_rejected() {
        use crate::models::{GoldenRule, RuleCondition};
        let mode = ModeConfig::new(ModeKind::Normal)
            .with_rule(GoldenRule::new("r", RuleCondition::ExternalCandidate))
            .with_rule(GoldenRule::new("r", RuleCondition::UnaccompaniedCover));
        let errors = validate_mode(&mode).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }
}
