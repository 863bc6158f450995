//! Task and lesson commands.
//!
//! One command type covers both nouns; a [`WorkKind`] selects which
//! record the operation touches.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::{Lesson, TaskItem};
use crate::services::{LessonService, TaskService};
use crate::store::Datastore;

/// Which kind of work item a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkKind {
    Task,
    Lesson,
}

impl WorkKind {
    fn noun(self) -> &'static str {
        match self {
            WorkKind::Task => "task",
            WorkKind::Lesson => "lesson",
        }
    }
}

/// A task or lesson flattened for output.
#[derive(Debug, Clone, Serialize)]
pub struct WorkRow {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl From<TaskItem> for WorkRow {
    fn from(t: TaskItem) -> Self {
        Self {
            id: t.id,
            completed: t.is_completed(),
            title: t.title,
            details: t.details,
            scheduled_for: t.scheduled_for,
        }
    }
}

impl From<Lesson> for WorkRow {
    fn from(l: Lesson) -> Self {
        Self {
            id: l.id,
            completed: l.is_completed(),
            title: l.title,
            details: l.details,
            scheduled_for: l.scheduled_for,
        }
    }
}

/// Output of the task and lesson commands.
#[derive(Debug, Clone, Serialize)]
pub struct WorkOutput {
    pub success: bool,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WorkRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkOutput {
    fn with_items(kind: WorkKind, items: Vec<WorkRow>) -> Self {
        Self {
            success: true,
            kind: kind.noun(),
            items,
            error: None,
        }
    }

    fn failure(kind: WorkKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            kind: kind.noun(),
            items: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The task and lesson command implementation.
pub struct WorkCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> WorkCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add a task or lesson for a student.
    #[allow(clippy::too_many_arguments)]
    pub fn run_add(
        &self,
        kind: WorkKind,
        student_id: Uuid,
        title: &str,
        details: Option<String>,
        scheduled_for: Option<DateTime<Utc>>,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> WorkOutput {
        let result = match kind {
            WorkKind::Task => TaskService::new(&self.store)
                .create(student_id, title, details, scheduled_for, guide_id)
                .map(WorkRow::from),
            WorkKind::Lesson => LessonService::new(&self.store)
                .create(student_id, title, details, scheduled_for, guide_id)
                .map(WorkRow::from),
        };
        match result {
            Ok(row) => WorkOutput::with_items(kind, vec![row]),
            Err(e) => WorkOutput::failure(kind, e.to_string()),
        }
    }

    /// List a student's items, newest first.
    pub fn run_list(
        &self,
        kind: WorkKind,
        student_id: Uuid,
        _options: &OutputOptions,
    ) -> WorkOutput {
        let result = match kind {
            WorkKind::Task => TaskService::new(&self.store)
                .list_for_student(student_id)
                .map(|items| items.into_iter().map(WorkRow::from).collect()),
            WorkKind::Lesson => LessonService::new(&self.store)
                .list_for_student(student_id)
                .map(|items| items.into_iter().map(WorkRow::from).collect()),
        };
        match result {
            Ok(rows) => WorkOutput::with_items(kind, rows),
            Err(e) => WorkOutput::failure(kind, e.to_string()),
        }
    }

    /// Mark an item completed, or reopen it.
    pub fn run_set_completed(
        &self,
        kind: WorkKind,
        id: Uuid,
        completed: bool,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> WorkOutput {
        let result = match kind {
            WorkKind::Task => TaskService::new(&self.store)
                .set_completed(id, completed, guide_id)
                .map(WorkRow::from),
            WorkKind::Lesson => LessonService::new(&self.store)
                .set_completed(id, completed, guide_id)
                .map(WorkRow::from),
        };
        match result {
            Ok(row) => WorkOutput::with_items(kind, vec![row]),
            Err(e) => WorkOutput::failure(kind, e.to_string()),
        }
    }

    /// Delete an item.
    pub fn run_delete(&self, kind: WorkKind, id: Uuid, _options: &OutputOptions) -> WorkOutput {
        let result = match kind {
            WorkKind::Task => TaskService::new(&self.store).delete(id),
            WorkKind::Lesson => LessonService::new(&self.store).delete(id),
        };
        match result {
            Ok(()) => WorkOutput::with_items(kind, Vec::new()),
            Err(e) => WorkOutput::failure(kind, e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &WorkOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "{} error: {}\n",
                    output.kind,
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if output.items.is_empty() {
                return format!("No {}s to show.\n", output.kind);
            }
            let mut text = String::new();
            for item in &output.items {
                let mark = if item.completed { "x" } else { " " };
                let due = item
                    .scheduled_for
                    .map(|d| format!(" (due {})", d.date_naive()))
                    .unwrap_or_default();
                text.push_str(&format!("[{}] {}  {}{}\n", mark, item.id, item.title, due));
            }
            text
        })
    }
}
