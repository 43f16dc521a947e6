//! Staff member model.
//!
//! Employees are the people who can cover a vacant slot: teachers,
//! assistants, management, and external substitutes. Flags on the
//! employee feed the mode-settings pre-filter and the golden rules.

use serde::{Deserialize, Serialize};

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Base role classification.
    pub role: StaffRole,
    /// Subjects this employee teaches.
    pub subjects: Vec<String>,
    /// Class this employee is home-room teacher of, if any.
    pub home_room_class: Option<String>,
    /// Hired from outside the regular staff (agency substitute).
    pub is_external: bool,
    /// Works a reduced schedule.
    pub is_part_time: bool,
    /// May not supervise a class without a second adult present.
    pub cannot_cover_alone: bool,
}

/// Base role classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    /// Regular subject teacher.
    Teacher,
    /// Teaching assistant.
    Assistant,
    /// Principal, deputy, coordinator.
    Management,
    /// Dedicated substitute (often external).
    Substitute,
}

impl Employee {
    /// Creates a new employee with the given role.
    pub fn new(id: impl Into<String>, role: StaffRole) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role,
            subjects: Vec::new(),
            home_room_class: None,
            is_external: false,
            is_part_time: false,
            cannot_cover_alone: false,
        }
    }

    /// Creates a regular teacher.
    pub fn teacher(id: impl Into<String>) -> Self {
        Self::new(id, StaffRole::Teacher)
    }

    /// Creates a teaching assistant.
    pub fn assistant(id: impl Into<String>) -> Self {
        Self::new(id, StaffRole::Assistant)
    }

    /// Creates an external substitute.
    pub fn substitute(id: impl Into<String>) -> Self {
        let mut e = Self::new(id, StaffRole::Substitute);
        e.is_external = true;
        e
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a taught subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Marks this employee as home-room teacher of a class.
    pub fn with_home_room(mut self, class_id: impl Into<String>) -> Self {
        self.home_room_class = Some(class_id.into());
        self
    }

    /// Marks the employee as external.
    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// Marks the employee as part-time.
    pub fn part_time(mut self) -> Self {
        self.is_part_time = true;
        self
    }

    /// Marks the employee as unable to supervise a class alone.
    pub fn needs_accompaniment(mut self) -> Self {
        self.cannot_cover_alone = true;
        self
    }

    /// Whether this employee teaches the given subject.
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Whether this employee is the home-room teacher of the given class.
    pub fn is_home_room_of(&self, class_id: &str) -> bool {
        self.home_room_class.as_deref() == Some(class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_builder() {
        let e = Employee::teacher("t1")
            .with_name("Dana Levi")
            .with_subject("math")
            .with_subject("physics")
            .with_home_room("5A")
            .part_time();

        assert_eq!(e.id, "t1");
        assert_eq!(e.role, StaffRole::Teacher);
        assert!(e.teaches("math"));
        assert!(!e.teaches("history"));
        assert!(e.is_home_room_of("5A"));
        assert!(!e.is_home_room_of("5B"));
        assert!(e.is_part_time);
        assert!(!e.is_external);
    }

    #[test]
    fn test_substitute_is_external() {
        let e = Employee::substitute("sub1");
        assert_eq!(e.role, StaffRole::Substitute);
        assert!(e.is_external);
    }

    #[test]
    fn test_needs_accompaniment() {
        let e = Employee::assistant("a1").needs_accompaniment();
        assert!(e.cannot_cover_alone);
    }
}
