//! Parent summaries: idempotent send-tracking and text composition.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{ParentSummaryLog, Student, SummaryPeriod};
use crate::store::{Datastore, RecordStore};

/// Track and compose parent summaries.
pub struct SummaryService<'a, S: Datastore> {
    store: &'a S,
    footer: &'a str,
}

impl<'a, S: Datastore> SummaryService<'a, S> {
    pub fn new(store: &'a S, footer: &'a str) -> Self {
        Self { store, footer }
    }

    /// Record that a summary was sent for a student and period.
    ///
    /// Idempotent per (student, period, normalized date): logging twice
    /// within the same period returns the existing log.
    pub fn log_parent_summary(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        guide_id: Uuid,
    ) -> Result<ParentSummaryLog> {
        let normalized = period.normalize(date);
        let existing =
            RecordStore::<ParentSummaryLog>::find_first(self.store, &|l: &ParentSummaryLog| {
                l.student_id == student_id && l.period == period && l.date == normalized
            })?;
        if let Some(log) = existing {
            return Ok(log);
        }
        let log = ParentSummaryLog::new(student_id, date, period, guide_id);
        self.store.put(&log)?;
        Ok(log)
    }

    /// Whether a summary was already sent for the period containing
    /// `date`.
    pub fn has_logged_parent_summary(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
    ) -> Result<bool> {
        let normalized = period.normalize(date);
        let existing =
            RecordStore::<ParentSummaryLog>::find_first(self.store, &|l: &ParentSummaryLog| {
                l.student_id == student_id && l.period == period && l.date == normalized
            })?;
        Ok(existing.is_some())
    }

    /// Compose the shareable summary text for a student.
    pub fn build_parent_summary(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        body: &str,
    ) -> Result<String> {
        let student: Option<Student> = self.store.get(student_id)?;
        let student =
            student.ok_or_else(|| PinkTowerError::not_found(format!("student {}", student_id)))?;

        let heading = match period {
            SummaryPeriod::Day => format!("{} on {}", student.display_name, date),
            SummaryPeriod::Week => {
                format!("{}, week of {}", student.display_name, period.normalize(date))
            }
            SummaryPeriod::Month => {
                format!("{}, month of {}", student.display_name, period.normalize(date))
            }
        };

        let mut text = heading;
        let body = body.trim();
        if !body.is_empty() {
            text.push_str("\n\n");
            text.push_str(body);
        }
        if !self.footer.is_empty() {
            text.push_str("\n\n");
            text.push_str(self.footer);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_log_is_idempotent_within_period() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "");
        let student_id = Uuid::new_v4();
        let guide_id = Uuid::new_v4();

        // Thursday and Friday of the same ISO week
        let first = service
            .log_parent_summary(student_id, date(2026, 8, 20), SummaryPeriod::Week, guide_id)
            .unwrap();
        let second = service
            .log_parent_summary(student_id, date(2026, 8, 21), SummaryPeriod::Week, guide_id)
            .unwrap();

        assert_eq!(first.id, second.id);
        let logs: Vec<ParentSummaryLog> = store.list().unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_distinct_periods_get_distinct_logs() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "");
        let student_id = Uuid::new_v4();
        let guide_id = Uuid::new_v4();

        service
            .log_parent_summary(student_id, date(2026, 8, 20), SummaryPeriod::Day, guide_id)
            .unwrap();
        service
            .log_parent_summary(student_id, date(2026, 8, 20), SummaryPeriod::Week, guide_id)
            .unwrap();
        service
            .log_parent_summary(student_id, date(2026, 8, 21), SummaryPeriod::Day, guide_id)
            .unwrap();

        let logs: Vec<ParentSummaryLog> = store.list().unwrap();
        assert_eq!(logs.len(), 3);
    }

    #[test]
    fn test_has_logged_checks_normalized_period() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "");
        let student_id = Uuid::new_v4();

        service
            .log_parent_summary(
                student_id,
                date(2026, 8, 17),
                SummaryPeriod::Week,
                Uuid::new_v4(),
            )
            .unwrap();

        // Any day in the same ISO week reports as logged
        assert!(service
            .has_logged_parent_summary(student_id, date(2026, 8, 23), SummaryPeriod::Week)
            .unwrap());
        // The following week does not
        assert!(!service
            .has_logged_parent_summary(student_id, date(2026, 8, 24), SummaryPeriod::Week)
            .unwrap());
    }

    #[test]
    fn test_build_parent_summary_with_footer() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "Sent from Pink Tower");
        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();

        let text = service
            .build_parent_summary(
                student.id,
                date(2026, 8, 20),
                SummaryPeriod::Day,
                "Ada chose the pink tower and worked for 40 minutes.",
            )
            .unwrap();

        assert!(text.starts_with("Ada Lovelace on 2026-08-20"));
        assert!(text.contains("worked for 40 minutes"));
        assert!(text.ends_with("Sent from Pink Tower"));
    }

    #[test]
    fn test_build_week_heading_uses_period_start() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "");
        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();

        let text = service
            .build_parent_summary(student.id, date(2026, 8, 20), SummaryPeriod::Week, "")
            .unwrap();
        assert_eq!(text, "Ada Lovelace, week of 2026-08-17");
    }

    #[test]
    fn test_build_for_missing_student_fails() {
        let store = MemoryStore::new();
        let service = SummaryService::new(&store, "");
        let err = service
            .build_parent_summary(Uuid::new_v4(), date(2026, 8, 20), SummaryPeriod::Day, "x")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
