//! Day context: the read-only snapshot a distribution run computes over.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{AbsenceLog, ClassItem, Employee, Lesson, LessonKind};

/// Read-only snapshot of one working day.
///
/// Carries the roster, classes, timetable, declared absences, and the
/// mode-specific exclusion/release sets. Built once per session; every
/// distribution pass is a pure computation over it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayContext {
    /// ISO date of the working day.
    pub date: String,
    /// Day of the week (0 = Sunday .. 6 = Saturday).
    pub day: u8,
    /// Number of periods in the school day (1-based periods).
    pub period_count: u8,
    /// Full staff roster, in display order.
    pub roster: Vec<Employee>,
    /// All classes.
    pub classes: Vec<ClassItem>,
    /// The weekly timetable. Queries filter to `day`.
    pub lessons: Vec<Lesson>,
    /// Declared absences for the day.
    pub absences: AbsenceLog,
    /// Employees excluded for mode-specific reasons (e.g. trip companions).
    pub excluded: HashSet<String>,
    /// Bench/pool: pre-declared reserve substitutes, in declaration order.
    pub pool: Vec<String>,
    /// Classes excused for the day (out on a trip). Their teachers are
    /// released.
    pub excused_classes: HashSet<String>,
    /// Employees released through a documented swap.
    pub swap_released: HashSet<String>,
}

impl DayContext {
    /// Creates a context for a date and weekday with an 8-period day.
    pub fn new(date: impl Into<String>, day: u8) -> Self {
        Self {
            date: date.into(),
            day,
            period_count: 8,
            ..Default::default()
        }
    }

    /// Sets the roster.
    pub fn with_roster(mut self, roster: Vec<Employee>) -> Self {
        self.roster = roster;
        self
    }

    /// Sets the classes.
    pub fn with_classes(mut self, classes: Vec<ClassItem>) -> Self {
        self.classes = classes;
        self
    }

    /// Sets the timetable.
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// Sets the absence log.
    pub fn with_absences(mut self, absences: AbsenceLog) -> Self {
        self.absences = absences;
        self
    }

    /// Declares a bench/pool member.
    pub fn with_pool_member(mut self, teacher_id: impl Into<String>) -> Self {
        self.pool.push(teacher_id.into());
        self
    }

    /// Excludes an employee for the day.
    pub fn with_excluded(mut self, teacher_id: impl Into<String>) -> Self {
        self.excluded.insert(teacher_id.into());
        self
    }

    /// Marks a class as excused (out on a trip).
    pub fn with_excused_class(mut self, class_id: impl Into<String>) -> Self {
        self.excused_classes.insert(class_id.into());
        self
    }

    /// Marks an employee as released through a documented swap.
    pub fn with_swap_released(mut self, teacher_id: impl Into<String>) -> Self {
        self.swap_released.insert(teacher_id.into());
        self
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.roster.iter().find(|e| e.id == id)
    }

    /// Looks up a class by id.
    pub fn class(&self, id: &str) -> Option<&ClassItem> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// The lesson (if any) a teacher has in a period today.
    pub fn lesson_for(&self, teacher_id: &str, period: u8) -> Option<&Lesson> {
        self.lessons
            .iter()
            .find(|l| l.day == self.day && l.period == period && l.teacher_id == teacher_id)
    }

    /// All lessons a teacher has today, in period order.
    pub fn lessons_for_teacher(&self, teacher_id: &str) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.day == self.day && l.teacher_id == teacher_id)
            .collect();
        lessons.sort_by_key(|l| l.period);
        lessons
    }

    /// The scheduled teaching lesson for a class in a period today.
    pub fn scheduled_lesson(&self, class_id: &str, period: u8) -> Option<&Lesson> {
        self.lessons.iter().find(|l| {
            l.day == self.day
                && l.period == period
                && l.kind == LessonKind::Actual
                && l.is_for_class(class_id)
        })
    }

    /// Periods in which a class has scheduled teaching today, ascending.
    pub fn class_periods(&self, class_id: &str) -> Vec<u8> {
        let mut periods: Vec<u8> = self
            .lessons
            .iter()
            .filter(|l| l.day == self.day && l.kind == LessonKind::Actual && l.is_for_class(class_id))
            .map(|l| l.period)
            .collect();
        periods.sort_unstable();
        periods.dedup();
        periods
    }

    /// First and last period a teacher works today, if they work at all.
    pub fn working_span(&self, teacher_id: &str) -> Option<(u8, u8)> {
        let lessons = self.lessons_for_teacher(teacher_id);
        let first = lessons.first()?.period;
        let last = lessons.last()?.period;
        Some((first, last))
    }

    /// Whether a teacher has an individual support period today.
    /// Qualifies a same-day swap against a protected catch-up period.
    pub fn has_individual_today(&self, teacher_id: &str) -> bool {
        self.lessons
            .iter()
            .any(|l| l.day == self.day && l.teacher_id == teacher_id && l.kind == LessonKind::Individual)
    }

    /// Whether a teacher teaches any class of the given grade today,
    /// or is home-room teacher of a class in that grade.
    pub fn teaches_grade(&self, teacher_id: &str, grade: u8) -> bool {
        let by_lesson = self.lessons.iter().any(|l| {
            l.day == self.day
                && l.teacher_id == teacher_id
                && l.class_id
                    .as_deref()
                    .and_then(|c| self.class(c))
                    .is_some_and(|c| c.grade_level == grade)
        });
        if by_lesson {
            return true;
        }
        self.employee(teacher_id)
            .and_then(|e| e.home_room_class.as_deref())
            .and_then(|c| self.class(c))
            .is_some_and(|c| c.grade_level == grade)
    }

    /// Whether a period lies inside the school day.
    pub fn period_in_day(&self, period: u8) -> bool {
        period >= 1 && period <= self.period_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassItem, Employee, Lesson};

    fn sample_ctx() -> DayContext {
        DayContext::new("2026-03-02", 1)
            .with_roster(vec![
                Employee::teacher("t1").with_home_room("5A"),
                Employee::teacher("t2"),
            ])
            .with_classes(vec![
                ClassItem::general("5A", 5),
                ClassItem::general("6A", 6),
            ])
            .with_lessons(vec![
                Lesson::actual("t1", "5A", 1, 1).with_subject("math"),
                Lesson::actual("t1", "6A", 1, 3),
                Lesson::stay("t1", 1, 4),
                Lesson::individual("t2", 1, 2),
                // Different day, must be invisible to queries
                Lesson::actual("t2", "5A", 2, 1),
            ])
    }

    #[test]
    fn test_lesson_for_filters_by_day() {
        let ctx = sample_ctx();
        assert!(ctx.lesson_for("t1", 1).is_some());
        assert!(ctx.lesson_for("t2", 1).is_none());
    }

    #[test]
    fn test_working_span() {
        let ctx = sample_ctx();
        assert_eq!(ctx.working_span("t1"), Some((1, 4)));
        assert_eq!(ctx.working_span("t2"), Some((2, 2)));
        assert_eq!(ctx.working_span("ghost"), None);
    }

    #[test]
    fn test_scheduled_lesson() {
        let ctx = sample_ctx();
        let l = ctx.scheduled_lesson("5A", 1).unwrap();
        assert_eq!(l.subject.as_deref(), Some("math"));
        assert!(ctx.scheduled_lesson("5A", 2).is_none());
    }

    #[test]
    fn test_class_periods() {
        let ctx = sample_ctx();
        assert_eq!(ctx.class_periods("5A"), vec![1]);
        assert_eq!(ctx.class_periods("6A"), vec![3]);
    }

    #[test]
    fn test_has_individual_today() {
        let ctx = sample_ctx();
        assert!(ctx.has_individual_today("t2"));
        assert!(!ctx.has_individual_today("t1"));
    }

    #[test]
    fn test_teaches_grade() {
        let ctx = sample_ctx();
        assert!(ctx.teaches_grade("t1", 5));
        assert!(ctx.teaches_grade("t1", 6));
        assert!(!ctx.teaches_grade("t2", 5)); // t2's 5A lesson is another day
    }

    #[test]
    fn test_period_in_day() {
        let ctx = sample_ctx();
        assert!(ctx.period_in_day(1));
        assert!(ctx.period_in_day(8));
        assert!(!ctx.period_in_day(0));
        assert!(!ctx.period_in_day(9));
    }
}
