//! Class/section model.

use serde::{Deserialize, Serialize};

/// A class (section) of students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassItem {
    /// Unique class identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grade level (1-based).
    pub grade_level: u8,
    /// Class classification.
    pub kind: ClassKind,
}

/// Class classification.
///
/// Only classes of the same grade *and* kind may be merged for
/// rainy-day supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// Regular class.
    General,
    /// Special-education class.
    Special,
}

impl ClassItem {
    /// Creates a general class.
    pub fn general(id: impl Into<String>, grade_level: u8) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            grade_level,
            kind: ClassKind::General,
        }
    }

    /// Creates a special-education class.
    pub fn special(id: impl Into<String>, grade_level: u8) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            grade_level,
            kind: ClassKind::Special,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Merge-group key: classes sharing this key may be merged.
    pub fn merge_key(&self) -> (u8, ClassKind) {
        (self.grade_level, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_builder() {
        let c = ClassItem::general("5A", 5).with_name("Fifth A");
        assert_eq!(c.id, "5A");
        assert_eq!(c.grade_level, 5);
        assert_eq!(c.kind, ClassKind::General);
        assert_eq!(c.name, "Fifth A");
    }

    #[test]
    fn test_merge_key() {
        let a = ClassItem::general("5A", 5);
        let b = ClassItem::general("5B", 5);
        let s = ClassItem::special("5S", 5);
        assert_eq!(a.merge_key(), b.merge_key());
        assert_ne!(a.merge_key(), s.merge_key());
    }
}
