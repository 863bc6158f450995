//! Parent-summary idempotency markers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The reporting period a parent summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl SummaryPeriod {
    /// Stable string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryPeriod::Day => "day",
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
        }
    }

    /// Normalize a date to the start of its period: the day itself, the
    /// ISO-week Monday, or the first of the month.
    pub fn normalize(&self, date: NaiveDate) -> NaiveDate {
        match self {
            SummaryPeriod::Day => date,
            SummaryPeriod::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            SummaryPeriod::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// Marks that a parent summary was sent for a student and period.
///
/// At most one log exists per (student, period, normalized date); the
/// date is normalized to the period start on construction so that two
/// sends within the same period collapse to the same key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentSummaryLog {
    /// Unique log identifier.
    pub id: Uuid,
    /// The student the summary was about.
    pub student_id: Uuid,
    /// Period start date (already normalized).
    pub date: NaiveDate,
    /// The period the summary covered.
    pub period: SummaryPeriod,
    /// The guide who sent the summary.
    pub created_by_guide_id: Uuid,
    /// When the log was recorded.
    pub created_at: DateTime<Utc>,
}

impl ParentSummaryLog {
    /// Create a new log; `date` is normalized to the period start.
    pub fn new(
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        created_by_guide_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            date: period.normalize(date),
            period,
            created_by_guide_id,
            created_at: Utc::now(),
        }
    }
}
