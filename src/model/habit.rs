//! Habits and per-day habit logs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recurrence frequency of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitCadence {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HabitCadence {
    /// Stable string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCadence::Daily => "daily",
            HabitCadence::Weekly => "weekly",
            HabitCadence::Monthly => "monthly",
        }
    }
}

/// A recurring trackable behavior owned by a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    /// Unique habit identifier.
    pub id: Uuid,
    /// The student this habit belongs to.
    pub student_id: Uuid,
    /// Habit name (e.g. "Attended class").
    pub name: String,
    /// Recurrence frequency.
    pub cadence: HabitCadence,
    /// The guide who created the habit.
    pub created_by_guide_id: Uuid,
    /// When the habit was created.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit for a student.
    pub fn new(
        student_id: Uuid,
        name: impl Into<String>,
        cadence: HabitCadence,
        created_by_guide_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            name: name.into(),
            cadence,
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }
}

/// A per-day completion record for a habit.
///
/// At most one log exists per (habit, calendar day). "Undone" is
/// represented by the absence of a log, not by `is_done: false`; the
/// toggle operation deletes and re-inserts rather than flipping the
/// flag. An `is_done: false` log only ever appears as a transient
/// return value, never in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitLog {
    /// Unique log identifier.
    pub id: Uuid,
    /// The habit this log belongs to.
    pub habit_id: Uuid,
    /// The calendar day this log covers.
    pub date: NaiveDate,
    /// Completion flag; always `true` for persisted logs.
    pub is_done: bool,
    /// The guide who recorded the log.
    pub created_by_guide_id: Uuid,
    /// When the log was recorded.
    pub created_at: DateTime<Utc>,
}

impl HabitLog {
    /// Create a new log for a habit on a calendar day.
    pub fn new(habit_id: Uuid, date: NaiveDate, is_done: bool, created_by_guide_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            date,
            is_done,
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }
}
