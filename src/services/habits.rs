//! Habit tracking: habits, per-day logs, and the toggle operation.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Habit, HabitCadence, HabitLog};
use crate::store::{Datastore, RecordStore};

/// Create habits and record per-day completion.
pub struct HabitService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> HabitService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new habit for a student.
    pub fn create(
        &self,
        student_id: Uuid,
        name: &str,
        cadence: HabitCadence,
        created_by: Uuid,
    ) -> Result<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinkTowerError::invalid_input("habit name cannot be empty"));
        }
        let habit = Habit::new(student_id, name, cadence, created_by);
        self.store.put(&habit)?;
        Ok(habit)
    }

    /// Fetch a habit by id.
    pub fn get(&self, id: Uuid) -> Result<Habit> {
        let habit: Option<Habit> = self.store.get(id)?;
        habit.ok_or_else(|| PinkTowerError::not_found(format!("habit {}", id)))
    }

    /// Delete a habit and every log recorded against it.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let logs = RecordStore::<HabitLog>::find(self.store, &|l: &HabitLog| l.habit_id == id)?;
        for log in logs {
            RecordStore::<HabitLog>::delete(self.store, log.id)?;
        }
        RecordStore::<Habit>::delete(self.store, id)
    }

    /// Habits belonging to a student, sorted by name.
    pub fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Habit>> {
        let mut habits = RecordStore::<Habit>::find(self.store, &|h: &Habit| {
            h.student_id == student_id
        })?;
        habits.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(habits)
    }

    /// Toggle a habit's completion on a calendar day.
    ///
    /// If no log exists for (habit, date), a done log is inserted and
    /// returned. If one exists, it is deleted and a transient
    /// `is_done: false` log is returned; that sentinel is never
    /// persisted, since "undone" is the absence of a log.
    pub fn toggle(&self, habit_id: Uuid, date: NaiveDate, guide_id: Uuid) -> Result<HabitLog> {
        let existing = RecordStore::<HabitLog>::find_first(self.store, &|l: &HabitLog| {
            l.habit_id == habit_id && l.date == date
        })?;

        match existing {
            Some(log) => {
                RecordStore::<HabitLog>::delete(self.store, log.id)?;
                Ok(HabitLog::new(habit_id, date, false, guide_id))
            }
            None => {
                let log = HabitLog::new(habit_id, date, true, guide_id);
                self.store.put(&log)?;
                Ok(log)
            }
        }
    }

    /// The log for a habit on a given day, if one exists.
    pub fn log_on(&self, habit_id: Uuid, date: NaiveDate) -> Result<Option<HabitLog>> {
        RecordStore::<HabitLog>::find_first(self.store, &|l: &HabitLog| {
            l.habit_id == habit_id && l.date == date
        })
    }

    /// All logs for a set of habits within an inclusive date range.
    pub fn logs_in_range(
        &self,
        habit_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HabitLog>> {
        RecordStore::<HabitLog>::find(self.store, &|l: &HabitLog| {
            habit_ids.contains(&l.habit_id) && l.date >= start && l.date <= end
        })
    }

    /// Habit names ranked by how many students use them, most popular
    /// first; ties break by case-insensitive name.
    pub fn popular_habit_names(&self, limit: usize) -> Result<Vec<(String, usize)>> {
        let habits: Vec<Habit> = self.store.list()?;
        let mut counts: HashMap<String, (String, usize)> = HashMap::new();
        for habit in habits {
            let key = habit.name.to_lowercase();
            let entry = counts.entry(key).or_insert_with(|| (habit.name.clone(), 0));
            entry.1 += 1;
        }
        let mut ranked: Vec<(String, usize)> = counts.into_values().collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
        });
        ranked.truncate(limit);
        Ok(ranked)
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
    fn test_toggle_creates_then_removes() {
        let store = MemoryStore::new();
        let service = HabitService::new(&store);
        let guide_id = Uuid::new_v4();
        let habit = service
            .create(Uuid::new_v4(), "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        let day = date(2026, 3, 9);

        // First toggle: done log inserted
        let done = service.toggle(habit.id, day, guide_id).unwrap();
        assert!(done.is_done);
        assert!(service.log_on(habit.id, day).unwrap().is_some());

        // Second toggle: log removed, transient undone sentinel returned
        let undone = service.toggle(habit.id, day, guide_id).unwrap();
        assert!(!undone.is_done);
        assert!(service.log_on(habit.id, day).unwrap().is_none());

        // The sentinel was not persisted
        let logs: Vec<HabitLog> = store.list().unwrap();
        assert!(logs.is_empty());
    }

    #[test]
    fn test_toggle_is_per_day() {
        let store = MemoryStore::new();
        let service = HabitService::new(&store);
        let guide_id = Uuid::new_v4();
        let habit = service
            .create(Uuid::new_v4(), "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();

        service.toggle(habit.id, date(2026, 3, 9), guide_id).unwrap();
        service.toggle(habit.id, date(2026, 3, 10), guide_id).unwrap();

        assert!(service.log_on(habit.id, date(2026, 3, 9)).unwrap().is_some());
        assert!(service.log_on(habit.id, date(2026, 3, 10)).unwrap().is_some());
    }

    #[test]
    fn test_logs_in_range() {
        let store = MemoryStore::new();
        let service = HabitService::new(&store);
        let guide_id = Uuid::new_v4();
        let habit = service
            .create(Uuid::new_v4(), "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        let other = service
            .create(Uuid::new_v4(), "Watered plants", HabitCadence::Daily, guide_id)
            .unwrap();

        service.toggle(habit.id, date(2026, 3, 9), guide_id).unwrap();
        service.toggle(habit.id, date(2026, 3, 12), guide_id).unwrap();
        service.toggle(other.id, date(2026, 3, 10), guide_id).unwrap();

        let logs = service
            .logs_in_range(&[habit.id], date(2026, 3, 9), date(2026, 3, 11))
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].date, date(2026, 3, 9));

        let both = service
            .logs_in_range(&[habit.id, other.id], date(2026, 3, 9), date(2026, 3, 12))
            .unwrap();
        assert_eq!(both.len(), 3);
    }

    #[test]
    fn test_popular_habit_names() {
        let store = MemoryStore::new();
        let service = HabitService::new(&store);
        let guide_id = Uuid::new_v4();

        for _ in 0..3 {
            service
                .create(Uuid::new_v4(), "Attended class", HabitCadence::Daily, guide_id)
                .unwrap();
        }
        service
            .create(Uuid::new_v4(), "watered plants", HabitCadence::Daily, guide_id)
            .unwrap();
        service
            .create(Uuid::new_v4(), "Put away work", HabitCadence::Daily, guide_id)
            .unwrap();

        let ranked = service.popular_habit_names(10).unwrap();
        assert_eq!(ranked[0], ("Attended class".to_string(), 3));
        // Tie between the two singles breaks by case-insensitive name
        assert_eq!(ranked[1].0, "Put away work");
        assert_eq!(ranked[2].0, "watered plants");

        let top_one = service.popular_habit_names(1).unwrap();
        assert_eq!(top_one.len(), 1);
    }

    #[test]
    fn test_delete_removes_logs() {
        let store = MemoryStore::new();
        let service = HabitService::new(&store);
        let guide_id = Uuid::new_v4();
        let habit = service
            .create(Uuid::new_v4(), "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        service.toggle(habit.id, date(2026, 3, 9), guide_id).unwrap();

        service.delete(habit.id).unwrap();

        assert!(service.get(habit.id).unwrap_err().is_not_found());
        let logs: Vec<HabitLog> = store.list().unwrap();
        assert!(logs.is_empty());
    }
}
