//! Student and parent-contact records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A child enrolled in one or more classrooms.
///
/// Referenced by id from `Classroom::student_ids`; the student record
/// itself does not know its classrooms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    /// Unique student identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Name shown in lists; defaults to "first last".
    pub display_name: String,
    /// Optional portrait image location.
    pub image_url: Option<String>,
    /// Free-form guide notes.
    pub notes: Option<String>,
    /// When the student record was created.
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// Create a new student; the display name defaults to
    /// "first_name last_name".
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let display_name = join_name_parts(&first_name, &last_name);
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            display_name,
            image_url: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Recompute the display name from the current first and last name.
    pub fn refresh_display_name(&mut self) {
        self.display_name = join_name_parts(&self.first_name, &self.last_name);
    }
}

// A single empty part must not leave a stray space in the display name.
fn join_name_parts(first_name: &str, last_name: &str) -> String {
    match (first_name.is_empty(), last_name.is_empty()) {
        (false, false) => format!("{} {}", first_name, last_name),
        (false, true) => first_name.to_string(),
        (true, _) => last_name.to_string(),
    }
}

/// A parent or guardian contact attached to a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentContact {
    /// Unique contact identifier.
    pub id: Uuid,
    /// The student this contact belongs to.
    pub student_id: Uuid,
    /// Contact full name.
    pub full_name: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// When the contact was created.
    pub created_at: DateTime<Utc>,
}

impl ParentContact {
    /// Create a new parent contact for a student.
    pub fn new(student_id: Uuid, full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            full_name: full_name.into(),
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }
}
