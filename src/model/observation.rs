//! Student observation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A written observation of a student, optionally tagging others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentObservation {
    /// Unique observation identifier.
    pub id: Uuid,
    /// The student this observation is primarily about.
    pub primary_student_id: Uuid,
    /// Other students mentioned in the observation.
    pub tagged_student_ids: Vec<Uuid>,
    /// The observation text.
    pub content: String,
    /// Optional subject-area tag (e.g. "sensorial").
    pub subject_tag: Option<String>,
    /// Optional material tag (e.g. "pink tower").
    pub material_tag: Option<String>,
    /// Optional application tag.
    pub app_tag: Option<String>,
    /// Attachment locations (photos, recordings).
    pub attachments: Vec<String>,
    /// The guide who wrote the observation.
    pub created_by_guide_id: Uuid,
    /// When the observation was written.
    pub created_at: DateTime<Utc>,
}

impl StudentObservation {
    /// Create a new observation for a student.
    pub fn new(
        primary_student_id: Uuid,
        content: impl Into<String>,
        created_by_guide_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            primary_student_id,
            tagged_student_ids: Vec::new(),
            content: content.into(),
            subject_tag: None,
            material_tag: None,
            app_tag: None,
            attachments: Vec::new(),
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }

    /// Tag additional students.
    pub fn with_tagged_students(mut self, ids: Vec<Uuid>) -> Self {
        self.tagged_student_ids = ids;
        self
    }

    /// Set the subject tag.
    pub fn with_subject_tag(mut self, tag: impl Into<String>) -> Self {
        self.subject_tag = Some(tag.into());
        self
    }

    /// Set the material tag.
    pub fn with_material_tag(mut self, tag: impl Into<String>) -> Self {
        self.material_tag = Some(tag.into());
        self
    }

    /// Set the application tag.
    pub fn with_app_tag(mut self, tag: impl Into<String>) -> Self {
        self.app_tag = Some(tag.into());
        self
    }
}
