//! Classroom records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of students and assigned guides within an
/// organization.
///
/// `guide_ids` and `student_ids` are plain id lists: assignment dedups
/// manually and nothing enforces referential integrity (deleting a
/// student does not clean the list).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: Uuid,
    /// The organization this classroom belongs to.
    pub org_id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional cover image location.
    pub image_url: Option<String>,
    /// Guides assigned to this classroom.
    pub guide_ids: Vec<Uuid>,
    /// Students enrolled in this classroom.
    pub student_ids: Vec<Uuid>,
    /// When the classroom was created.
    pub created_at: DateTime<Utc>,
}

impl Classroom {
    /// Create a new empty classroom in an organization.
    pub fn new(org_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            name: name.into(),
            image_url: None,
            guide_ids: Vec::new(),
            student_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the given guide is assigned to this classroom.
    pub fn has_guide(&self, guide_id: Uuid) -> bool {
        self.guide_ids.contains(&guide_id)
    }

    /// Whether the given student is enrolled in this classroom.
    pub fn has_student(&self, student_id: Uuid) -> bool {
        self.student_ids.contains(&student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_classroom_is_empty() {
        let room = Classroom::new(Uuid::new_v4(), "Primary A");
        assert_eq!(room.name, "Primary A");
        assert!(room.guide_ids.is_empty());
        assert!(room.student_ids.is_empty());
    }

    #[test]
    fn test_membership_checks() {
        let mut room = Classroom::new(Uuid::new_v4(), "Primary B");
        let guide_id = Uuid::new_v4();
        let student_id = Uuid::new_v4();
        assert!(!room.has_guide(guide_id));
        assert!(!room.has_student(student_id));

        room.guide_ids.push(guide_id);
        room.student_ids.push(student_id);
        assert!(room.has_guide(guide_id));
        assert!(room.has_student(student_id));
    }
}
