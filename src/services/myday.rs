//! The My Day board: per-guide daily/weekly aggregation.
//!
//! Aggregation is read-only and fail-open: any sub-fetch that errors
//! contributes an empty list instead of failing the board. Quick
//! actions mutate one record and synchronously re-aggregate.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{FailOpen, Result};
use crate::model::{
    Classroom, Habit, HabitCadence, HabitLog, Lesson, Student, StudentObservation, SummaryPeriod,
    TaskItem,
};
use crate::services::{HabitService, LessonService, SummaryService, TaskService};
use crate::store::{Datastore, RecordStore};

/// The aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
}

impl Period {
    /// The inclusive date range for a period containing `today`:
    /// the single day, or Monday through Sunday of the ISO week.
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Day => (today, today),
            Period::Week => {
                let monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(6))
            }
        }
    }

    fn summary_period(&self) -> SummaryPeriod {
        match self {
            Period::Day => SummaryPeriod::Day,
            Period::Week => SummaryPeriod::Week,
        }
    }
}

/// One student's row on the board.
#[derive(Debug, Clone, Serialize)]
pub struct StudentStatus {
    pub student: Student,
    /// Whether any observation about the student was written in range.
    pub has_observation: bool,
    /// Whether a parent summary was already sent for this period.
    pub summary_sent: bool,
    /// Daily-habit completion in [0.0, 1.0].
    pub habit_percent: f64,
}

/// The aggregated board for one guide and period.
#[derive(Debug, Clone, Serialize)]
pub struct MyDaySnapshot {
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Outstanding tasks across the guide's students, soonest first.
    pub tasks: Vec<TaskItem>,
    /// Outstanding lessons across the guide's students, soonest first.
    pub lessons: Vec<Lesson>,
    /// Per-student statuses, lowest habit completion first.
    pub statuses: Vec<StudentStatus>,
}

/// Builds [`MyDaySnapshot`]s and applies quick actions.
///
/// The clock is threaded explicitly: callers pass `today` instead of
/// the aggregator reading the wall clock, so a board can be computed
/// for any date.
pub struct DailyAggregator<'a, S: Datastore> {
    store: &'a S,
    guide_id: Uuid,
    summary_footer: &'a str,
}

impl<'a, S: Datastore> DailyAggregator<'a, S> {
    pub fn new(store: &'a S, guide_id: Uuid, summary_footer: &'a str) -> Self {
        Self {
            store,
            guide_id,
            summary_footer,
        }
    }

    /// Aggregate the board for the period containing `today`.
    pub fn aggregate(&self, period: Period, today: NaiveDate) -> MyDaySnapshot {
        let (start, end) = period.range(today);

        let classrooms = self.classrooms_of_guide();
        let student_ids = Self::union_student_ids(&classrooms);

        let mut tasks = Vec::new();
        let mut lessons = Vec::new();
        let mut statuses = Vec::new();

        for student_id in student_ids {
            let Some(student) = self.fetch_student(student_id) else {
                continue;
            };

            tasks.extend(self.outstanding_tasks(student_id, start, end));
            lessons.extend(self.outstanding_lessons(student_id, start, end));

            statuses.push(StudentStatus {
                has_observation: self.has_observation(student_id, start, end),
                summary_sent: self.summary_sent(student_id, period, today),
                habit_percent: self.habit_percent(student_id, period, today, start, end),
                student,
            });
        }

        tasks.sort_by_key(|t| t.sort_time());
        lessons.sort_by_key(|l| l.sort_time());
        statuses.sort_by(|a, b| {
            a.habit_percent
                .partial_cmp(&b.habit_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        MyDaySnapshot {
            period,
            start,
            end,
            tasks,
            lessons,
            statuses,
        }
    }

    /// Quick action: complete a task, then re-aggregate.
    pub fn complete_task(
        &self,
        task_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<MyDaySnapshot> {
        TaskService::new(self.store).set_completed(task_id, true, self.guide_id)?;
        Ok(self.aggregate(period, today))
    }

    /// Quick action: complete a lesson, then re-aggregate.
    pub fn complete_lesson(
        &self,
        lesson_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<MyDaySnapshot> {
        LessonService::new(self.store).set_completed(lesson_id, true, self.guide_id)?;
        Ok(self.aggregate(period, today))
    }

    /// Quick action: mark the parent summary sent for this period, then
    /// re-aggregate.
    pub fn mark_summary_sent(
        &self,
        student_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<MyDaySnapshot> {
        SummaryService::new(self.store, self.summary_footer).log_parent_summary(
            student_id,
            today,
            period.summary_period(),
            self.guide_id,
        )?;
        Ok(self.aggregate(period, today))
    }

    /// Quick action: mark every daily habit of a student done for
    /// today, skipping ones already done, then re-aggregate.
    pub fn complete_daily_habits(
        &self,
        student_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<MyDaySnapshot> {
        let habits = HabitService::new(self.store);
        for habit in self.daily_habits(student_id)? {
            if habits.log_on(habit.id, today)?.is_none() {
                habits.toggle(habit.id, today, self.guide_id)?;
            }
        }
        Ok(self.aggregate(period, today))
    }

    fn classrooms_of_guide(&self) -> Vec<Classroom> {
        let guide_id = self.guide_id;
        RecordStore::<Classroom>::find(self.store, &|c: &Classroom| c.has_guide(guide_id))
            .fail_open_default("fetching classrooms for board")
    }

    fn union_student_ids(classrooms: &[Classroom]) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for classroom in classrooms {
            for id in &classroom.student_ids {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }

    fn fetch_student(&self, student_id: Uuid) -> Option<Student> {
        let student: Result<Option<Student>> = self.store.get(student_id);
        student.fail_open_default("fetching student for board")
    }

    fn outstanding_tasks(&self, student_id: Uuid, start: NaiveDate, end: NaiveDate) -> Vec<TaskItem> {
        RecordStore::<TaskItem>::find(self.store, &|t: &TaskItem| {
            t.student_id == student_id && !t.is_completed() && Self::due_in_range(t.scheduled_for, start, end)
        })
        .fail_open_default("fetching tasks for board")
    }

    fn outstanding_lessons(&self, student_id: Uuid, start: NaiveDate, end: NaiveDate) -> Vec<Lesson> {
        RecordStore::<Lesson>::find(self.store, &|l: &Lesson| {
            l.student_id == student_id && !l.is_completed() && Self::due_in_range(l.scheduled_for, start, end)
        })
        .fail_open_default("fetching lessons for board")
    }

    /// Undated items always count; dated ones must fall in the range.
    fn due_in_range(
        scheduled_for: Option<chrono::DateTime<chrono::Utc>>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> bool {
        match scheduled_for {
            None => true,
            Some(due) => {
                let day = due.date_naive();
                day >= start && day <= end
            }
        }
    }

    fn has_observation(&self, student_id: Uuid, start: NaiveDate, end: NaiveDate) -> bool {
        let found = RecordStore::<StudentObservation>::find_first(
            self.store,
            &|o: &StudentObservation| {
                let day = o.created_at.date_naive();
                day >= start
                    && day <= end
                    && (o.primary_student_id == student_id
                        || o.tagged_student_ids.contains(&student_id))
            },
        )
        .fail_open_default("fetching observations for board");
        found.is_some()
    }

    fn summary_sent(&self, student_id: Uuid, period: Period, today: NaiveDate) -> bool {
        SummaryService::new(self.store, self.summary_footer)
            .has_logged_parent_summary(student_id, today, period.summary_period())
            .fail_open_default("fetching summary logs for board")
    }

    /// Daily-habit completion for the period.
    ///
    /// Day: habits with a done log today over the daily-habit count.
    /// Week: done logs in [start, min(end, today)] over
    /// (elapsed days + 1) x the daily-habit count. Future days of the
    /// week are excluded from the denominator.
    fn habit_percent(
        &self,
        student_id: Uuid,
        period: Period,
        today: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> f64 {
        let habits = self
            .daily_habits(student_id)
            .fail_open_default("fetching habits for board");
        if habits.is_empty() {
            return 0.0;
        }
        let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();

        match period {
            Period::Day => {
                let logs = self.done_logs(&habit_ids, today, today);
                let done = habits
                    .iter()
                    .filter(|h| logs.iter().any(|l| l.habit_id == h.id))
                    .count();
                done as f64 / habits.len() as f64
            }
            Period::Week => {
                let effective_end = end.min(today);
                let logs = self.done_logs(&habit_ids, start, effective_end);
                let elapsed_days = (effective_end - start).num_days().max(0) + 1;
                let expected = elapsed_days as f64 * habits.len() as f64;
                logs.len() as f64 / expected
            }
        }
    }

    fn daily_habits(&self, student_id: Uuid) -> Result<Vec<Habit>> {
        RecordStore::<Habit>::find(self.store, &|h: &Habit| {
            h.student_id == student_id && h.cadence == HabitCadence::Daily
        })
    }

    fn done_logs(&self, habit_ids: &[Uuid], start: NaiveDate, end: NaiveDate) -> Vec<HabitLog> {
        let logs = HabitService::new(self.store)
            .logs_in_range(habit_ids, start, end)
            .fail_open_default("fetching habit logs for board");
        logs.into_iter().filter(|l| l.is_done).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A guide with one classroom and the given students enrolled.
    fn board_fixture(store: &MemoryStore, students: &[&Student]) -> Uuid {
        let guide_id = Uuid::new_v4();
        let mut classroom = Classroom::new(Uuid::new_v4(), "Primary A");
        classroom.guide_ids.push(guide_id);
        for student in students {
            store.put(*student).unwrap();
            classroom.student_ids.push(student.id);
        }
        store.put(&classroom).unwrap();
        guide_id
    }

    #[test]
    fn test_day_range_is_single_day() {
        let today = date(2026, 8, 20);
        assert_eq!(Period::Day.range(today), (today, today));
    }

    #[test]
    fn test_week_range_is_iso_week() {
        // 2026-08-20 is a Thursday
        let (start, end) = Period::Week.range(date(2026, 8, 20));
        assert_eq!(start, date(2026, 8, 17));
        assert_eq!(end, date(2026, 8, 23));

        // A Monday starts its own week
        let (start, end) = Period::Week.range(date(2026, 8, 17));
        assert_eq!(start, date(2026, 8, 17));
        assert_eq!(end, date(2026, 8, 23));
    }

    #[test]
    fn test_day_habit_percent_half_done() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = date(2026, 8, 20);

        let habits = HabitService::new(&store);
        let a = habits
            .create(student.id, "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        habits
            .create(student.id, "Put away work", HabitCadence::Daily, guide_id)
            .unwrap();
        habits.toggle(a.id, today, guide_id).unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, today);

        assert_eq!(snapshot.statuses.len(), 1);
        assert!((snapshot.statuses[0].habit_percent - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_daily_habits_means_zero_percent() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, date(2026, 8, 20));
        assert_eq!(snapshot.statuses[0].habit_percent, 0.0);
    }

    #[test]
    fn test_week_percent_uses_elapsed_days() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);

        let habits = HabitService::new(&store);
        let habit = habits
            .create(student.id, "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();

        // Week of Mon 2026-08-17; today is Wednesday, 3 elapsed days.
        let today = date(2026, 8, 19);
        habits.toggle(habit.id, date(2026, 8, 17), guide_id).unwrap();
        habits.toggle(habit.id, date(2026, 8, 18), guide_id).unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Week, today);

        // 2 done logs / (3 elapsed days x 1 habit)
        assert!((snapshot.statuses[0].habit_percent - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_outstanding_work_filters_and_order() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = date(2026, 8, 20);

        let tasks = TaskService::new(&store);
        let undated = tasks
            .create(student.id, "Undated", None, None, guide_id)
            .unwrap();
        let due_today = tasks
            .create(
                student.id,
                "Due today",
                None,
                Some(today.and_hms_opt(9, 0, 0).unwrap().and_utc()),
                guide_id,
            )
            .unwrap();
        // Out of range: due next month
        tasks
            .create(
                student.id,
                "Far future",
                None,
                Some(date(2026, 9, 20).and_hms_opt(9, 0, 0).unwrap().and_utc()),
                guide_id,
            )
            .unwrap();
        // Completed tasks never show
        let done = tasks
            .create(student.id, "Done", None, None, guide_id)
            .unwrap();
        tasks.set_completed(done.id, true, guide_id).unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, today);

        let titles: Vec<&str> = snapshot.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Undated"));
        assert!(titles.contains(&"Due today"));
        // Ascending by scheduled_for ?? created_at
        let first_key = snapshot.tasks[0].sort_time();
        let second_key = snapshot.tasks[1].sort_time();
        assert!(first_key <= second_key);

        // Sanity: ids survived aggregation
        assert!(snapshot
            .tasks
            .iter()
            .any(|t| t.id == undated.id || t.id == due_today.id));
    }

    #[test]
    fn test_statuses_sorted_by_habit_percent_ascending() {
        let store = MemoryStore::new();
        let ahead = Student::new("Ahead", "Student");
        let behind = Student::new("Behind", "Student");
        let guide_id = board_fixture(&store, &[&ahead, &behind]);
        let today = date(2026, 8, 20);

        let habits = HabitService::new(&store);
        let done_habit = habits
            .create(ahead.id, "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        habits
            .create(behind.id, "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        habits.toggle(done_habit.id, today, guide_id).unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, today);

        assert_eq!(snapshot.statuses[0].student.id, behind.id);
        assert_eq!(snapshot.statuses[1].student.id, ahead.id);
    }

    #[test]
    fn test_observation_and_summary_flags() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = Utc::now().date_naive();

        store
            .put(&StudentObservation::new(
                student.id,
                "Chose the pink tower",
                guide_id,
            ))
            .unwrap();
        SummaryService::new(&store, "")
            .log_parent_summary(student.id, today, SummaryPeriod::Day, guide_id)
            .unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, today);

        assert!(snapshot.statuses[0].has_observation);
        assert!(snapshot.statuses[0].summary_sent);
    }

    #[test]
    fn test_complete_task_quick_action_excludes_it() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = date(2026, 8, 20);

        let task = TaskService::new(&store)
            .create(student.id, "Pour water", None, None, guide_id)
            .unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let before = aggregator.aggregate(Period::Day, today);
        assert_eq!(before.tasks.len(), 1);

        let after = aggregator.complete_task(task.id, Period::Day, today).unwrap();
        assert!(after.tasks.is_empty());
    }

    #[test]
    fn test_complete_daily_habits_quick_action() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = date(2026, 8, 20);

        let habits = HabitService::new(&store);
        let already = habits
            .create(student.id, "Attended class", HabitCadence::Daily, guide_id)
            .unwrap();
        habits
            .create(student.id, "Put away work", HabitCadence::Daily, guide_id)
            .unwrap();
        // Weekly habits are not touched
        habits
            .create(student.id, "Library visit", HabitCadence::Weekly, guide_id)
            .unwrap();
        habits.toggle(already.id, today, guide_id).unwrap();

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator
            .complete_daily_habits(student.id, Period::Day, today)
            .unwrap();

        // Already-done habit was skipped, not toggled back off
        assert!((snapshot.statuses[0].habit_percent - 1.0).abs() < f64::EPSILON);
        let logs: Vec<HabitLog> = store.list().unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn test_mark_summary_sent_quick_action() {
        let store = MemoryStore::new();
        let student = Student::new("Ada", "Lovelace");
        let guide_id = board_fixture(&store, &[&student]);
        let today = date(2026, 8, 20);

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let before = aggregator.aggregate(Period::Day, today);
        assert!(!before.statuses[0].summary_sent);

        let after = aggregator
            .mark_summary_sent(student.id, Period::Day, today)
            .unwrap();
        assert!(after.statuses[0].summary_sent);
    }

    #[test]
    fn test_student_in_two_classrooms_counted_once() {
        let store = MemoryStore::new();
        let guide_id = Uuid::new_v4();
        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();

        for name in ["Primary A", "Primary B"] {
            let mut classroom = Classroom::new(Uuid::new_v4(), name);
            classroom.guide_ids.push(guide_id);
            classroom.student_ids.push(student.id);
            store.put(&classroom).unwrap();
        }

        let aggregator = DailyAggregator::new(&store, guide_id, "");
        let snapshot = aggregator.aggregate(Period::Day, date(2026, 8, 20));
        assert_eq!(snapshot.statuses.len(), 1);
    }

    #[test]
    fn test_guide_without_classrooms_gets_empty_board() {
        let store = MemoryStore::new();
        let aggregator = DailyAggregator::new(&store, Uuid::new_v4(), "");
        let snapshot = aggregator.aggregate(Period::Week, date(2026, 8, 20));
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.lessons.is_empty());
        assert!(snapshot.statuses.is_empty());
    }
}
