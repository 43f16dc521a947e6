//! Mode settings: coarse pre-filter toggles.
//!
//! Grouped by domain. Purely restrictive: disabling a capability here
//! removes matching candidates before golden-rule and ladder evaluation
//! runs, so the rule machinery never sees them.

use serde::{Deserialize, Serialize};

/// Teacher-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSettings {
    /// Allow external substitutes as candidates.
    pub allow_external: bool,
    /// Keep teachers with zero lessons today as candidates.
    /// When false, a zero-lesson teacher is treated as off-duty.
    pub include_off_duty: bool,
    /// Allow teachers flagged cannot-cover-alone.
    pub allow_unaccompanied: bool,
}

/// Lesson-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSettings {
    /// Allow covering from a protected catch-up period at all.
    pub allow_stay_cover: bool,
    /// Allow converting individual support periods to coverage.
    pub allow_individual_cover: bool,
}

/// Time-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Only consider a teacher between their first and last lesson today.
    pub respect_working_hours: bool,
}

/// Class-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSettings {
    /// Allow pulling home-room teachers of special-education classes.
    pub include_special_staff: bool,
}

/// Subject-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSettings {
    /// Only consider teachers of the target slot's scheduled subject.
    pub require_subject_match: bool,
}

/// Staffing-domain toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingSettings {
    /// Cap on coverage slots per teacher per day.
    pub daily_cover_cap: Option<u32>,
    /// Surface pool/bench members ahead of other buckets.
    pub prefer_pool: bool,
}

/// Presentation toggles. Carried in the configuration but not consulted
/// by the algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Show per-candidate score breakdowns.
    pub show_breakdown: bool,
    /// Surface uncovered slots prominently.
    pub surface_uncovered: bool,
}

/// The full toggle set for one mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSettings {
    pub teacher: TeacherSettings,
    pub lesson: LessonSettings,
    pub time: TimeSettings,
    pub class: ClassSettings,
    pub subject: SubjectSettings,
    pub staffing: StaffingSettings,
    pub ui: UiSettings,
}

impl Default for ModeSettings {
    /// Permissive defaults: nothing is filtered until an operator
    /// restricts it.
    fn default() -> Self {
        Self {
            teacher: TeacherSettings {
                allow_external: true,
                include_off_duty: true,
                allow_unaccompanied: true,
            },
            lesson: LessonSettings {
                allow_stay_cover: true,
                allow_individual_cover: true,
            },
            time: TimeSettings {
                respect_working_hours: false,
            },
            class: ClassSettings {
                include_special_staff: true,
            },
            subject: SubjectSettings {
                require_subject_match: false,
            },
            staffing: StaffingSettings {
                daily_cover_cap: None,
                prefer_pool: true,
            },
            ui: UiSettings {
                show_breakdown: true,
                surface_uncovered: true,
            },
        }
    }
}

impl ModeSettings {
    /// Internal-staff-only settings: no externals, no converted periods.
    pub fn strict_internal() -> Self {
        let mut s = Self::default();
        s.teacher.allow_external = false;
        s.lesson.allow_stay_cover = false;
        s.lesson.allow_individual_cover = false;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let s = ModeSettings::default();
        assert!(s.teacher.allow_external);
        assert!(s.teacher.include_off_duty);
        assert!(s.lesson.allow_stay_cover);
        assert!(s.staffing.daily_cover_cap.is_none());
        assert!(!s.time.respect_working_hours);
    }

    #[test]
    fn test_strict_internal() {
        let s = ModeSettings::strict_internal();
        assert!(!s.teacher.allow_external);
        assert!(!s.lesson.allow_stay_cover);
        assert!(!s.lesson.allow_individual_cover);
    }
}
