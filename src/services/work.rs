//! Task and lesson services.
//!
//! Tasks and lessons are structural twins, so both services are
//! generated from one macro over their record type.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Lesson, TaskItem};
use crate::store::{Datastore, RecordStore};

macro_rules! impl_work_service {
    ($service:ident, $ty:ty, $noun:literal) => {
        pub struct $service<'a, S: Datastore> {
            store: &'a S,
        }

        impl<'a, S: Datastore> $service<'a, S> {
            pub fn new(store: &'a S) -> Self {
                Self { store }
            }

            /// Create a new open item for a student.
            pub fn create(
                &self,
                student_id: Uuid,
                title: &str,
                details: Option<String>,
                scheduled_for: Option<DateTime<Utc>>,
                created_by: Uuid,
            ) -> Result<$ty> {
                let title = title.trim();
                if title.is_empty() {
                    return Err(PinkTowerError::invalid_input(concat!(
                        $noun,
                        " title cannot be empty"
                    )));
                }
                let mut item = <$ty>::new(student_id, title, created_by);
                item.details = details;
                item.scheduled_for = scheduled_for;
                self.store.put(&item)?;
                Ok(item)
            }

            /// Fetch an item by id.
            pub fn get(&self, id: Uuid) -> Result<$ty> {
                let item: Option<$ty> = self.store.get(id)?;
                item.ok_or_else(|| {
                    PinkTowerError::not_found(format!(concat!($noun, " {}"), id))
                })
            }

            /// Items for a student, newest first by creation time.
            pub fn list_for_student(&self, student_id: Uuid) -> Result<Vec<$ty>> {
                let mut items = RecordStore::<$ty>::find(self.store, &|t: &$ty| {
                    t.student_id == student_id
                })?;
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(items)
            }

            /// Mark an item completed or reopen it.
            pub fn set_completed(&self, id: Uuid, completed: bool, guide_id: Uuid) -> Result<$ty> {
                let mut item = self.get(id)?;
                if completed {
                    item.completed_at = Some(Utc::now());
                    item.completed_by_guide_id = Some(guide_id);
                } else {
                    item.completed_at = None;
                    item.completed_by_guide_id = None;
                }
                self.store.put(&item)?;
                Ok(item)
            }

            /// Delete an item.
            pub fn delete(&self, id: Uuid) -> Result<()> {
                RecordStore::<$ty>::delete(self.store, id)
            }
        }
    };
}

impl_work_service!(TaskService, TaskItem, "task");
impl_work_service!(LessonService, Lesson, "lesson");
