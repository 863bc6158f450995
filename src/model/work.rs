//! Tasks and lessons: schedulable, completable work items for a student.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A one-off task for a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskItem {
    /// Unique task identifier.
    pub id: Uuid,
    /// The student this task belongs to.
    pub student_id: Uuid,
    /// Short task title.
    pub title: String,
    /// Optional longer description.
    pub details: Option<String>,
    /// When the task is due, if scheduled.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// When the task was completed, if it has been.
    pub completed_at: Option<DateTime<Utc>>,
    /// The guide who completed it.
    pub completed_by_guide_id: Option<Uuid>,
    /// The guide who created it.
    pub created_by_guide_id: Uuid,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl TaskItem {
    /// Create a new open task.
    pub fn new(student_id: Uuid, title: impl Into<String>, created_by_guide_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            title: title.into(),
            details: None,
            scheduled_for: None,
            completed_at: None,
            completed_by_guide_id: None,
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }

    /// Set the details text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the due time.
    pub fn with_schedule(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(scheduled_for);
        self
    }

    /// Whether the task has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The time used for chronological ordering: the due time when
    /// scheduled, otherwise the creation time.
    pub fn sort_time(&self) -> DateTime<Utc> {
        self.scheduled_for.unwrap_or(self.created_at)
    }
}

/// A planned lesson presentation for a student.
///
/// Structurally a twin of [`TaskItem`]; kept as a distinct record type
/// because lessons and tasks are listed, filtered, and completed through
/// separate surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    /// Unique lesson identifier.
    pub id: Uuid,
    /// The student this lesson belongs to.
    pub student_id: Uuid,
    /// Short lesson title.
    pub title: String,
    /// Optional longer description.
    pub details: Option<String>,
    /// When the lesson is planned for, if scheduled.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// When the lesson was given, if it has been.
    pub completed_at: Option<DateTime<Utc>>,
    /// The guide who gave it.
    pub completed_by_guide_id: Option<Uuid>,
    /// The guide who planned it.
    pub created_by_guide_id: Uuid,
    /// When the lesson was created.
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Create a new open lesson.
    pub fn new(student_id: Uuid, title: impl Into<String>, created_by_guide_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            title: title.into(),
            details: None,
            scheduled_for: None,
            completed_at: None,
            completed_by_guide_id: None,
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }

    /// Set the details text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the planned time.
    pub fn with_schedule(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(scheduled_for);
        self
    }

    /// Whether the lesson has been given.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The time used for chronological ordering: the planned time when
    /// scheduled, otherwise the creation time.
    pub fn sort_time(&self) -> DateTime<Utc> {
        self.scheduled_for.unwrap_or(self.created_at)
    }
}
