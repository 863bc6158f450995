//! Habit commands: add, list, toggle, popular names.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::{Habit, HabitCadence};
use crate::services::HabitService;
use crate::store::Datastore;

/// Output of the habit commands.
#[derive(Debug, Clone, Serialize)]
pub struct HabitOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub habits: Vec<Habit>,
    /// Completion state after a toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
    /// (name, usage count) pairs from the popular listing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub popular: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HabitOutput {
    fn with_habits(habits: Vec<Habit>) -> Self {
        Self {
            success: true,
            habits,
            is_done: None,
            popular: Vec::new(),
            error: None,
        }
    }

    fn toggled(is_done: bool) -> Self {
        Self {
            success: true,
            habits: Vec::new(),
            is_done: Some(is_done),
            popular: Vec::new(),
            error: None,
        }
    }

    fn with_popular(popular: Vec<(String, usize)>) -> Self {
        Self {
            success: true,
            habits: Vec::new(),
            is_done: None,
            popular,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            habits: Vec::new(),
            is_done: None,
            popular: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The habit command implementation.
pub struct HabitCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> HabitCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add a habit to a student.
    pub fn run_add(
        &self,
        student_id: Uuid,
        name: &str,
        cadence: HabitCadence,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> HabitOutput {
        match HabitService::new(&self.store).create(student_id, name, cadence, guide_id) {
            Ok(habit) => HabitOutput::with_habits(vec![habit]),
            Err(e) => HabitOutput::failure(e.to_string()),
        }
    }

    /// List a student's habits.
    pub fn run_list(&self, student_id: Uuid, _options: &OutputOptions) -> HabitOutput {
        match HabitService::new(&self.store).list_for_student(student_id) {
            Ok(habits) => HabitOutput::with_habits(habits),
            Err(e) => HabitOutput::failure(e.to_string()),
        }
    }

    /// Toggle a habit's completion on a date.
    pub fn run_toggle(
        &self,
        habit_id: Uuid,
        date: NaiveDate,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> HabitOutput {
        match HabitService::new(&self.store).toggle(habit_id, date, guide_id) {
            Ok(log) => HabitOutput::toggled(log.is_done),
            Err(e) => HabitOutput::failure(e.to_string()),
        }
    }

    /// Show the most-used habit names.
    pub fn run_popular(&self, limit: usize, _options: &OutputOptions) -> HabitOutput {
        match HabitService::new(&self.store).popular_habit_names(limit) {
            Ok(popular) => HabitOutput::with_popular(popular),
            Err(e) => HabitOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HabitOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Habit error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if let Some(is_done) = output.is_done {
                return if is_done {
                    "Marked done.\n".to_string()
                } else {
                    "Marked not done.\n".to_string()
                };
            }
            let mut text = String::new();
            for habit in &output.habits {
                text.push_str(&format!(
                    "{}  {} ({})\n",
                    habit.id,
                    habit.name,
                    habit.cadence.as_str()
                ));
            }
            for (name, count) in &output.popular {
                text.push_str(&format!("{:>4}  {}\n", count, name));
            }
            if text.is_empty() {
                text.push_str("(nothing to show)\n");
            }
            text
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_add_list_toggle() {
        let store = Arc::new(MemoryStore::new());
        let command = HabitCommand::new(Arc::clone(&store));
        let student_id = Uuid::new_v4();
        let guide_id = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();

        let added = command.run_add(
            student_id,
            "Attended class",
            HabitCadence::Daily,
            guide_id,
            &OutputOptions::default(),
        );
        let habit_id = added.habits[0].id;

        let listed = command.run_list(student_id, &OutputOptions::default());
        assert_eq!(listed.habits.len(), 1);

        let on = command.run_toggle(habit_id, day, guide_id, &OutputOptions::default());
        assert_eq!(on.is_done, Some(true));
        let off = command.run_toggle(habit_id, day, guide_id, &OutputOptions::default());
        assert_eq!(off.is_done, Some(false));
    }

    #[test]
    fn test_popular() {
        let store = Arc::new(MemoryStore::new());
        let command = HabitCommand::new(Arc::clone(&store));
        let guide_id = Uuid::new_v4();

        for _ in 0..2 {
            command.run_add(
                Uuid::new_v4(),
                "Attended class",
                HabitCadence::Daily,
                guide_id,
                &OutputOptions::default(),
            );
        }

        let popular = command.run_popular(5, &OutputOptions::default());
        assert_eq!(popular.popular[0], ("Attended class".to_string(), 2));
    }
}
