//! Parent-summary commands: compose shareable text and track sends.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::SummaryPeriod;
use crate::services::SummaryService;
use crate::store::Datastore;

/// Output of the summary commands.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    pub success: bool,
    /// Composed shareable text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether a summary was sent for the queried period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryOutput {
    fn composed(text: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            sent: None,
            error: None,
        }
    }

    fn with_sent(sent: bool) -> Self {
        Self {
            success: true,
            text: None,
            sent: Some(sent),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            sent: None,
            error: Some(error.into()),
        }
    }
}

/// The summary command implementation.
pub struct SummaryCommand<S: Datastore> {
    store: S,
    footer: String,
}

impl<S: Datastore> SummaryCommand<S> {
    pub fn new(store: S, footer: String) -> Self {
        Self { store, footer }
    }

    /// Compose the shareable summary text for a student.
    pub fn run_compose(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        body: &str,
        _options: &OutputOptions,
    ) -> SummaryOutput {
        let service = SummaryService::new(&self.store, &self.footer);
        match service.build_parent_summary(student_id, date, period, body) {
            Ok(text) => SummaryOutput::composed(text),
            Err(e) => SummaryOutput::failure(e.to_string()),
        }
    }

    /// Record that a summary was sent for the period containing `date`.
    pub fn run_mark_sent(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> SummaryOutput {
        let service = SummaryService::new(&self.store, &self.footer);
        match service.log_parent_summary(student_id, date, period, guide_id) {
            Ok(_) => SummaryOutput::with_sent(true),
            Err(e) => SummaryOutput::failure(e.to_string()),
        }
    }

    /// Check whether a summary was sent for the period containing `date`.
    pub fn run_status(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        period: SummaryPeriod,
        _options: &OutputOptions,
    ) -> SummaryOutput {
        let service = SummaryService::new(&self.store, &self.footer);
        match service.has_logged_parent_summary(student_id, date, period) {
            Ok(sent) => SummaryOutput::with_sent(sent),
            Err(e) => SummaryOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SummaryOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Summary error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if let Some(text) = &output.text {
                return format!("{}\n", text);
            }
            match output.sent {
                Some(true) => "Summary sent.\n".to_string(),
                Some(false) => "Summary not sent yet.\n".to_string(),
                None => String::new(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Student;
    use crate::store::{MemoryStore, RecordStore};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compose_includes_footer() {
        let store = Arc::new(MemoryStore::new());
        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();
        let command =
            SummaryCommand::new(Arc::clone(&store), "Sent from Pink Tower".to_string());

        let output = command.run_compose(
            student.id,
            date(2026, 8, 20),
            SummaryPeriod::Day,
            "Ada worked with the red rods.",
            &OutputOptions::default(),
        );
        assert!(output.success);
        let text = output.text.unwrap();
        assert!(text.starts_with("Ada Lovelace on 2026-08-20"));
        assert!(text.ends_with("Sent from Pink Tower"));
    }

    #[test]
    fn test_mark_sent_then_status() {
        let store = Arc::new(MemoryStore::new());
        let command = SummaryCommand::new(Arc::clone(&store), String::new());
        let student_id = Uuid::new_v4();
        let guide_id = Uuid::new_v4();

        let before = command.run_status(
            student_id,
            date(2026, 8, 20),
            SummaryPeriod::Week,
            &OutputOptions::default(),
        );
        assert_eq!(before.sent, Some(false));

        command.run_mark_sent(
            student_id,
            date(2026, 8, 20),
            SummaryPeriod::Week,
            guide_id,
            &OutputOptions::default(),
        );

        // Any day in the same ISO week reports as sent
        let after = command.run_status(
            student_id,
            date(2026, 8, 23),
            SummaryPeriod::Week,
            &OutputOptions::default(),
        );
        assert_eq!(after.sent, Some(true));
    }

    #[test]
    fn test_compose_missing_student_fails() {
        let store = Arc::new(MemoryStore::new());
        let command = SummaryCommand::new(store, String::new());
        let output = command.run_compose(
            Uuid::new_v4(),
            date(2026, 8, 20),
            SummaryPeriod::Day,
            "x",
            &OutputOptions::default(),
        );
        assert!(!output.success);
    }
}
