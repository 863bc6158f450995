//! Student CRUD and parent contacts.

use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Habit, HabitCadence, ParentContact, Student};
use crate::store::{Datastore, RecordStore};

/// Fields of a student that can be updated; `None` leaves a field as-is.
#[derive(Debug, Default, Clone)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

/// Create, update, and delete students.
///
/// Creation seeds the configured default daily habits onto the new
/// student so the My Day board has something to track from day one.
pub struct StudentService<'a, S: Datastore> {
    store: &'a S,
    seed_habits: &'a [String],
}

impl<'a, S: Datastore> StudentService<'a, S> {
    pub fn new(store: &'a S, seed_habits: &'a [String]) -> Self {
        Self { store, seed_habits }
    }

    /// Enroll a new student, seeding the default daily habits.
    pub fn create(&self, first_name: &str, last_name: &str, created_by: Uuid) -> Result<Student> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() && last_name.is_empty() {
            return Err(PinkTowerError::invalid_input("student name cannot be empty"));
        }
        let student = Student::new(first_name, last_name);
        self.store.put(&student)?;

        for name in self.seed_habits {
            let habit = Habit::new(student.id, name.clone(), HabitCadence::Daily, created_by);
            self.store.put(&habit)?;
        }

        tracing::debug!("enrolled student {} ({})", student.display_name, student.id);
        Ok(student)
    }

    /// Fetch a student by id.
    pub fn get(&self, id: Uuid) -> Result<Student> {
        let student: Option<Student> = self.store.get(id)?;
        student.ok_or_else(|| PinkTowerError::not_found(format!("student {}", id)))
    }

    /// Apply a partial update; name changes recompute the display name.
    pub fn update(&self, id: Uuid, update: StudentUpdate) -> Result<Student> {
        let mut student = self.get(id)?;
        let mut name_changed = false;
        if let Some(first_name) = update.first_name {
            student.first_name = first_name.trim().to_string();
            name_changed = true;
        }
        if let Some(last_name) = update.last_name {
            student.last_name = last_name.trim().to_string();
            name_changed = true;
        }
        if name_changed {
            if student.first_name.is_empty() && student.last_name.is_empty() {
                return Err(PinkTowerError::invalid_input("student name cannot be empty"));
            }
            student.refresh_display_name();
        }
        if let Some(image_url) = update.image_url {
            student.image_url = Some(image_url);
        }
        if let Some(notes) = update.notes {
            student.notes = Some(notes);
        }
        self.store.put(&student)?;
        Ok(student)
    }

    /// Delete a student record. Classroom rosters, habits, and
    /// observations are left in place.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        RecordStore::<Student>::delete(self.store, id)
    }

    /// All students, sorted by display name.
    pub fn list(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = self.store.list()?;
        students.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        });
        Ok(students)
    }

    /// Attach a parent contact to a student.
    pub fn add_parent_contact(
        &self,
        student_id: Uuid,
        full_name: &str,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<ParentContact> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(PinkTowerError::invalid_input("contact name cannot be empty"));
        }
        // Ensure the student exists before attaching
        self.get(student_id)?;
        let mut contact = ParentContact::new(student_id, full_name);
        contact.email = email;
        contact.phone = phone;
        self.store.put(&contact)?;
        Ok(contact)
    }

    /// Parent contacts attached to a student.
    pub fn parent_contacts(&self, student_id: Uuid) -> Result<Vec<ParentContact>> {
        RecordStore::<ParentContact>::find(self.store, &|c: &ParentContact| {
            c.student_id == student_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const NO_SEEDS: &[String] = &[];

    #[test]
    fn test_create_seeds_default_habits() {
        let store = MemoryStore::new();
        let seeds = vec!["Attended class".to_string(), "Put away work".to_string()];
        let service = StudentService::new(&store, &seeds);
        let guide_id = Uuid::new_v4();

        let student = service.create("Ada", "Lovelace", guide_id).unwrap();

        let habits = RecordStore::<Habit>::find(&store, &|h: &Habit| h.student_id == student.id)
            .unwrap();
        assert_eq!(habits.len(), 2);
        assert!(habits.iter().all(|h| h.cadence == HabitCadence::Daily));
        assert!(habits.iter().all(|h| h.created_by_guide_id == guide_id));
    }

    #[test]
    fn test_create_without_seeds() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);

        let student = service.create("Ada", "Lovelace", Uuid::new_v4()).unwrap();
        let habits: Vec<Habit> = store.list().unwrap();
        assert!(habits.is_empty());
        assert_eq!(student.display_name, "Ada Lovelace");
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        assert!(service.create("  ", "", Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_update_recomputes_display_name() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        let student = service.create("Ada", "Lovelace", Uuid::new_v4()).unwrap();

        let updated = service
            .update(
                student.id,
                StudentUpdate {
                    last_name: Some("Byron".to_string()),
                    ..StudentUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.display_name, "Ada Byron");
    }

    #[test]
    fn test_update_notes_keeps_display_name() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        let student = service.create("Ada", "Lovelace", Uuid::new_v4()).unwrap();

        let updated = service
            .update(
                student.id,
                StudentUpdate {
                    notes: Some("prefers sensorial work".to_string()),
                    ..StudentUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.display_name, "Ada Lovelace");
        assert_eq!(updated.notes.as_deref(), Some("prefers sensorial work"));
    }

    #[test]
    fn test_parent_contacts() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        let student = service.create("Ada", "Lovelace", Uuid::new_v4()).unwrap();

        service
            .add_parent_contact(
                student.id,
                "Anne Byron",
                Some("anne@example.com".to_string()),
                None,
            )
            .unwrap();

        let contacts = service.parent_contacts(student.id).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].full_name, "Anne Byron");
        assert_eq!(contacts[0].email.as_deref(), Some("anne@example.com"));
    }

    #[test]
    fn test_add_contact_to_missing_student_fails() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        let err = service
            .add_parent_contact(Uuid::new_v4(), "Anne", None, None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_sorted_by_display_name() {
        let store = MemoryStore::new();
        let service = StudentService::new(&store, NO_SEEDS);
        service.create("Zoe", "Adams", Uuid::new_v4()).unwrap();
        service.create("ada", "Lovelace", Uuid::new_v4()).unwrap();

        let names: Vec<String> = service
            .list()
            .unwrap()
            .into_iter()
            .map(|s| s.display_name)
            .collect();
        assert_eq!(names, vec!["ada Lovelace", "Zoe Adams"]);
    }
}
