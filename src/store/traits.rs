//! Storage traits for Pink Tower records.
//!
//! `RecordStore<R>` is the per-type CRUD surface; `Datastore` is the
//! supertrait covering every record type, which services take as their
//! single storage handle. Backends persist on every `put`/`delete`;
//! there is no separate save step.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    Classroom, Guide, Habit, HabitLog, Invite, Lesson, Membership, Organization, ParentContact,
    ParentSummaryLog, Student, StudentObservation, TaskItem,
};

/// A persisted record type.
///
/// `KIND` names the record's collection (the subdirectory in the file
/// backend); `record_id` returns the generated unique identifier.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, used for on-disk layout.
    const KIND: &'static str;

    /// The record's unique identifier.
    fn record_id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($ty:ty, $kind:literal) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;

            fn record_id(&self) -> Uuid {
                self.id
            }
        }
    };
}

impl_record!(Organization, "organizations");
impl_record!(Guide, "guides");
impl_record!(Membership, "memberships");
impl_record!(Classroom, "classrooms");
impl_record!(Student, "students");
impl_record!(ParentContact, "parent_contacts");
impl_record!(Habit, "habits");
impl_record!(HabitLog, "habit_logs");
impl_record!(TaskItem, "tasks");
impl_record!(Lesson, "lessons");
impl_record!(StudentObservation, "observations");
impl_record!(Invite, "invites");
impl_record!(ParentSummaryLog, "summary_logs");

/// CRUD plus predicate queries over one record type.
pub trait RecordStore<R: Record> {
    /// Retrieve a record by id. Returns `Ok(None)` if it doesn't exist.
    fn get(&self, id: Uuid) -> Result<Option<R>>;

    /// Insert a new record or overwrite an existing one.
    fn put(&self, record: &R) -> Result<()>;

    /// Delete a record. Returns `Ok(())` even if it doesn't exist.
    fn delete(&self, id: Uuid) -> Result<()>;

    /// List every record of this type, in no particular order.
    fn list(&self) -> Result<Vec<R>>;

    /// All records matching a predicate.
    fn find(&self, pred: &dyn Fn(&R) -> bool) -> Result<Vec<R>> {
        Ok(self.list()?.into_iter().filter(|r| pred(r)).collect())
    }

    /// The first record matching a predicate, if any.
    fn find_first(&self, pred: &dyn Fn(&R) -> bool) -> Result<Option<R>> {
        Ok(self.list()?.into_iter().find(|r| pred(r)))
    }

    /// Check whether a record exists.
    fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

/// Blanket implementation of RecordStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: RecordStore<R>` is expected,
/// which is useful for sharing stores between tests and services.
impl<R: Record, T: RecordStore<R> + ?Sized> RecordStore<R> for Arc<T> {
    fn get(&self, id: Uuid) -> Result<Option<R>> {
        (**self).get(id)
    }

    fn put(&self, record: &R) -> Result<()> {
        (**self).put(record)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<R>> {
        (**self).list()
    }
}

/// The full datastore: one handle covering every record type.
pub trait Datastore:
    RecordStore<Organization>
    + RecordStore<Guide>
    + RecordStore<Membership>
    + RecordStore<Classroom>
    + RecordStore<Student>
    + RecordStore<ParentContact>
    + RecordStore<Habit>
    + RecordStore<HabitLog>
    + RecordStore<TaskItem>
    + RecordStore<Lesson>
    + RecordStore<StudentObservation>
    + RecordStore<Invite>
    + RecordStore<ParentSummaryLog>
    + Send
    + Sync
{
}

impl<T> Datastore for T where
    T: RecordStore<Organization>
        + RecordStore<Guide>
        + RecordStore<Membership>
        + RecordStore<Classroom>
        + RecordStore<Student>
        + RecordStore<ParentContact>
        + RecordStore<Habit>
        + RecordStore<HabitLog>
        + RecordStore<TaskItem>
        + RecordStore<Lesson>
        + RecordStore<StudentObservation>
        + RecordStore<Invite>
        + RecordStore<ParentSummaryLog>
        + Send
        + Sync
{
}
