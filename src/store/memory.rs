//! In-memory record storage for testing.
//!
//! Thread-safe implementation using one `RwLock<HashMap>` per record
//! kind. Records are stored in memory and lost when the store is
//! dropped. Wrap in `Arc` to share between a test and the service
//! under test.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    Classroom, Guide, Habit, HabitLog, Invite, Lesson, Membership, Organization, ParentContact,
    ParentSummaryLog, Student, StudentObservation, TaskItem,
};
use crate::store::{Record, RecordStore};

/// In-memory datastore for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    organizations: RwLock<HashMap<Uuid, Organization>>,
    guides: RwLock<HashMap<Uuid, Guide>>,
    memberships: RwLock<HashMap<Uuid, Membership>>,
    classrooms: RwLock<HashMap<Uuid, Classroom>>,
    students: RwLock<HashMap<Uuid, Student>>,
    parent_contacts: RwLock<HashMap<Uuid, ParentContact>>,
    habits: RwLock<HashMap<Uuid, Habit>>,
    habit_logs: RwLock<HashMap<Uuid, HabitLog>>,
    tasks: RwLock<HashMap<Uuid, TaskItem>>,
    lessons: RwLock<HashMap<Uuid, Lesson>>,
    observations: RwLock<HashMap<Uuid, StudentObservation>>,
    invites: RwLock<HashMap<Uuid, Invite>>,
    summary_logs: RwLock<HashMap<Uuid, ParentSummaryLog>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! impl_memory_store {
    ($field:ident, $ty:ty) => {
        impl RecordStore<$ty> for MemoryStore {
            fn get(&self, id: Uuid) -> Result<Option<$ty>> {
                Ok(self.$field.read().unwrap().get(&id).cloned())
            }

            fn put(&self, record: &$ty) -> Result<()> {
                self.$field
                    .write()
                    .unwrap()
                    .insert(record.record_id(), record.clone());
                Ok(())
            }

            fn delete(&self, id: Uuid) -> Result<()> {
                self.$field.write().unwrap().remove(&id);
                Ok(())
            }

            fn list(&self) -> Result<Vec<$ty>> {
                Ok(self.$field.read().unwrap().values().cloned().collect())
            }
        }
    };
}

impl_memory_store!(organizations, Organization);
impl_memory_store!(guides, Guide);
impl_memory_store!(memberships, Membership);
impl_memory_store!(classrooms, Classroom);
impl_memory_store!(students, Student);
impl_memory_store!(parent_contacts, ParentContact);
impl_memory_store!(habits, Habit);
impl_memory_store!(habit_logs, HabitLog);
impl_memory_store!(tasks, TaskItem);
impl_memory_store!(lessons, Lesson);
impl_memory_store!(observations, StudentObservation);
impl_memory_store!(invites, Invite);
impl_memory_store!(summary_logs, ParentSummaryLog);
