//! Coverage domain models.
//!
//! Core data types for representing a school day's staffing problem
//! and its solution. Pure data — discovery, rule evaluation, and
//! distribution all read and write these types.
//!
//! # Domain Mappings
//!
//! | class-cover | Timetable term |
//! |-------------|----------------|
//! | Employee | Staff member (teacher, assistant, external substitute) |
//! | Lesson | Recurring (day, period) teaching slot |
//! | ClassItem | Class/section |
//! | ModeConfig | Operating policy (exam, trip, rainy, ...) |
//! | AssignmentBoard | Per-session coverage state |

mod assignment;
mod class;
mod employee;
mod lesson;
mod mode;
mod records;
mod settings;
mod slot;

pub use assignment::{AssignmentBoard, SlotEntry};
pub use class::{ClassItem, ClassKind};
pub use employee::{Employee, StaffRole};
pub use lesson::{Lesson, LessonKind};
pub use mode::{
    ClassRelationship, EnforcementLevel, GoldenRule, ModeConfig, ModeKind, PriorityStep,
    RuleAction, RuleCondition, StepCriteria, TeacherType,
};
pub use records::{AbsenceKind, AbsenceLog, AbsenceRecord, SubstitutionRecord};
pub use settings::{
    ClassSettings, LessonSettings, ModeSettings, StaffingSettings, SubjectSettings,
    TeacherSettings, TimeSettings, UiSettings,
};
pub use slot::{Slot, SlotState};
