//! My Day commands: show the board and apply quick actions.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::services::{DailyAggregator, MyDaySnapshot, Period};
use crate::store::Datastore;

/// Output of the myday commands.
#[derive(Debug, Clone, Serialize)]
pub struct MyDayOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<MyDaySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MyDayOutput {
    fn with_snapshot(snapshot: MyDaySnapshot) -> Self {
        Self {
            success: true,
            snapshot: Some(snapshot),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            snapshot: None,
            error: Some(error.into()),
        }
    }
}

/// The myday command implementation.
pub struct MyDayCommand<S: Datastore> {
    store: S,
    summary_footer: String,
}

impl<S: Datastore> MyDayCommand<S> {
    pub fn new(store: S, summary_footer: String) -> Self {
        Self {
            store,
            summary_footer,
        }
    }

    fn aggregator(&self, guide_id: Uuid) -> DailyAggregator<'_, S> {
        DailyAggregator::new(&self.store, guide_id, &self.summary_footer)
    }

    /// Show the board for a guide.
    pub fn run_show(
        &self,
        guide_id: Uuid,
        period: Period,
        today: NaiveDate,
        _options: &OutputOptions,
    ) -> MyDayOutput {
        MyDayOutput::with_snapshot(self.aggregator(guide_id).aggregate(period, today))
    }

    /// Complete a task from the board.
    pub fn run_complete_task(
        &self,
        guide_id: Uuid,
        task_id: Uuid,
        period: Period,
        today: NaiveDate,
        _options: &OutputOptions,
    ) -> MyDayOutput {
        match self.aggregator(guide_id).complete_task(task_id, period, today) {
            Ok(snapshot) => MyDayOutput::with_snapshot(snapshot),
            Err(e) => MyDayOutput::failure(e.to_string()),
        }
    }

    /// Complete a lesson from the board.
    pub fn run_complete_lesson(
        &self,
        guide_id: Uuid,
        lesson_id: Uuid,
        period: Period,
        today: NaiveDate,
        _options: &OutputOptions,
    ) -> MyDayOutput {
        match self
            .aggregator(guide_id)
            .complete_lesson(lesson_id, period, today)
        {
            Ok(snapshot) => MyDayOutput::with_snapshot(snapshot),
            Err(e) => MyDayOutput::failure(e.to_string()),
        }
    }

    /// Mark a student's parent summary sent for the period.
    pub fn run_summary_sent(
        &self,
        guide_id: Uuid,
        student_id: Uuid,
        period: Period,
        today: NaiveDate,
        _options: &OutputOptions,
    ) -> MyDayOutput {
        match self
            .aggregator(guide_id)
            .mark_summary_sent(student_id, period, today)
        {
            Ok(snapshot) => MyDayOutput::with_snapshot(snapshot),
            Err(e) => MyDayOutput::failure(e.to_string()),
        }
    }

    /// Mark all of a student's daily habits done for today.
    pub fn run_habits_done(
        &self,
        guide_id: Uuid,
        student_id: Uuid,
        period: Period,
        today: NaiveDate,
        _options: &OutputOptions,
    ) -> MyDayOutput {
        match self
            .aggregator(guide_id)
            .complete_daily_habits(student_id, period, today)
        {
            Ok(snapshot) => MyDayOutput::with_snapshot(snapshot),
            Err(e) => MyDayOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &MyDayOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "My Day error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            let Some(snapshot) = &output.snapshot else {
                return String::new();
            };
            let mut text = format!("My Day: {} to {}\n", snapshot.start, snapshot.end);

            text.push_str(&format!("\nTasks ({}):\n", snapshot.tasks.len()));
            for task in &snapshot.tasks {
                text.push_str(&format!("  [ ] {}  {}\n", task.id, task.title));
            }

            text.push_str(&format!("\nLessons ({}):\n", snapshot.lessons.len()));
            for lesson in &snapshot.lessons {
                text.push_str(&format!("  [ ] {}  {}\n", lesson.id, lesson.title));
            }

            text.push_str(&format!("\nStudents ({}):\n", snapshot.statuses.len()));
            for status in &snapshot.statuses {
                text.push_str(&format!(
                    "  {:>3.0}%  {}{}{}\n",
                    status.habit_percent * 100.0,
                    status.student.display_name,
                    if status.has_observation {
                        "  [observed]"
                    } else {
                        ""
                    },
                    if status.summary_sent {
                        "  [summary sent]"
                    } else {
                        ""
                    },
                ));
            }
            text
        })
    }
}
