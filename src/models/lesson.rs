//! Lesson model.
//!
//! A lesson is a recurring scheduled slot in the weekly timetable,
//! identified by (teacher, day, period). The lesson kind determines
//! how the teacher's time in that period may be used for coverage.

use serde::{Deserialize, Serialize};

/// A recurring scheduled teaching slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Day of the week (0 = Sunday .. 6 = Saturday).
    pub day: u8,
    /// Period within the day (1-based).
    pub period: u8,
    /// Teacher holding this slot.
    pub teacher_id: String,
    /// Class being taught. `None` for teacher-only slots (stay, duty).
    pub class_id: Option<String>,
    /// Scheduled subject, when one applies.
    pub subject: Option<String>,
    /// How the slot is used.
    pub kind: LessonKind,
}

/// Classification of a lesson slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonKind {
    /// Regular frontal teaching of a class.
    Actual,
    /// Protected catch-up period ("stay"/makooth). Not teaching time;
    /// covered by the stay-protection golden rule.
    Stay,
    /// One-on-one support period. Convertible to coverage.
    Individual,
    /// Yard/hall duty. The teacher is occupied but not in a classroom.
    Duty,
}

impl Lesson {
    /// Creates a regular teaching lesson.
    pub fn actual(
        teacher_id: impl Into<String>,
        class_id: impl Into<String>,
        day: u8,
        period: u8,
    ) -> Self {
        Self {
            day,
            period,
            teacher_id: teacher_id.into(),
            class_id: Some(class_id.into()),
            subject: None,
            kind: LessonKind::Actual,
        }
    }

    /// Creates a protected catch-up period.
    pub fn stay(teacher_id: impl Into<String>, day: u8, period: u8) -> Self {
        Self {
            day,
            period,
            teacher_id: teacher_id.into(),
            class_id: None,
            subject: None,
            kind: LessonKind::Stay,
        }
    }

    /// Creates an individual support period.
    pub fn individual(teacher_id: impl Into<String>, day: u8, period: u8) -> Self {
        Self {
            day,
            period,
            teacher_id: teacher_id.into(),
            class_id: None,
            subject: None,
            kind: LessonKind::Individual,
        }
    }

    /// Creates a duty slot.
    pub fn duty(teacher_id: impl Into<String>, day: u8, period: u8) -> Self {
        Self {
            day,
            period,
            teacher_id: teacher_id.into(),
            class_id: None,
            subject: None,
            kind: LessonKind::Duty,
        }
    }

    /// Sets the scheduled subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Whether this lesson teaches the given class.
    pub fn is_for_class(&self, class_id: &str) -> bool {
        self.class_id.as_deref() == Some(class_id)
    }
}
