//! Classroom CRUD and roster assignment.

use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::Classroom;
use crate::store::{Datastore, RecordStore};

/// Create classrooms and manage their guide and student rosters.
pub struct ClassroomService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> ClassroomService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new classroom in an organization.
    pub fn create(&self, org_id: Uuid, name: &str) -> Result<Classroom> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinkTowerError::invalid_input(
                "classroom name cannot be empty",
            ));
        }
        let classroom = Classroom::new(org_id, name);
        self.store.put(&classroom)?;
        tracing::debug!("created classroom {} in org {}", classroom.id, org_id);
        Ok(classroom)
    }

    /// Fetch a classroom by id.
    pub fn get(&self, id: Uuid) -> Result<Classroom> {
        let classroom: Option<Classroom> = self.store.get(id)?;
        classroom.ok_or_else(|| PinkTowerError::not_found(format!("classroom {}", id)))
    }

    /// Rename a classroom and optionally set its cover image.
    pub fn update(&self, id: Uuid, name: &str, image_url: Option<String>) -> Result<Classroom> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinkTowerError::invalid_input(
                "classroom name cannot be empty",
            ));
        }
        let mut classroom = self.get(id)?;
        classroom.name = name.to_string();
        if image_url.is_some() {
            classroom.image_url = image_url;
        }
        self.store.put(&classroom)?;
        Ok(classroom)
    }

    /// Delete a classroom. Enrolled students and assigned guides are
    /// untouched.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        RecordStore::<Classroom>::delete(self.store, id)
    }

    /// Classrooms belonging to an organization, sorted by name.
    pub fn list_for_org(&self, org_id: Uuid) -> Result<Vec<Classroom>> {
        let mut rooms = RecordStore::<Classroom>::find(self.store, &|c: &Classroom| {
            c.org_id == org_id
        })?;
        rooms.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(rooms)
    }

    /// Classrooms a guide is assigned to, across all organizations.
    pub fn list_for_guide(&self, guide_id: Uuid) -> Result<Vec<Classroom>> {
        RecordStore::<Classroom>::find(self.store, &|c: &Classroom| c.has_guide(guide_id))
    }

    /// Enroll a student. Assigning twice is a no-op.
    pub fn assign_student(&self, classroom_id: Uuid, student_id: Uuid) -> Result<Classroom> {
        let mut classroom = self.get(classroom_id)?;
        if !classroom.has_student(student_id) {
            classroom.student_ids.push(student_id);
            self.store.put(&classroom)?;
        }
        Ok(classroom)
    }

    /// Remove a student from the roster. Removing an absent student is
    /// a no-op.
    pub fn unassign_student(&self, classroom_id: Uuid, student_id: Uuid) -> Result<Classroom> {
        let mut classroom = self.get(classroom_id)?;
        if classroom.has_student(student_id) {
            classroom.student_ids.retain(|id| *id != student_id);
            self.store.put(&classroom)?;
        }
        Ok(classroom)
    }

    /// Assign a guide. Assigning twice is a no-op.
    pub fn assign_guide(&self, classroom_id: Uuid, guide_id: Uuid) -> Result<Classroom> {
        let mut classroom = self.get(classroom_id)?;
        if !classroom.has_guide(guide_id) {
            classroom.guide_ids.push(guide_id);
            self.store.put(&classroom)?;
        }
        Ok(classroom)
    }

    /// Remove a guide assignment. Removing an absent guide is a no-op.
    pub fn unassign_guide(&self, classroom_id: Uuid, guide_id: Uuid) -> Result<Classroom> {
        let mut classroom = self.get(classroom_id)?;
        if classroom.has_guide(guide_id) {
            classroom.guide_ids.retain(|id| *id != guide_id);
            self.store.put(&classroom)?;
        }
        Ok(classroom)
    }
}
