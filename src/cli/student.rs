//! Student commands: enroll, update, list, parent contacts.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::{ParentContact, Student};
use crate::services::{Action, ClassroomService, MembershipService, StudentService, StudentUpdate};
use crate::store::Datastore;

/// Output of the student commands.
#[derive(Debug, Clone, Serialize)]
pub struct StudentOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub students: Vec<Student>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ParentContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StudentOutput {
    fn with_students(students: Vec<Student>) -> Self {
        Self {
            success: true,
            students,
            contacts: Vec::new(),
            error: None,
        }
    }

    fn with_contacts(contacts: Vec<ParentContact>) -> Self {
        Self {
            success: true,
            students: Vec::new(),
            contacts,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            students: Vec::new(),
            contacts: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The student command implementation.
pub struct StudentCommand<S: Datastore> {
    store: S,
    seed_habits: Vec<String>,
}

impl<S: Datastore> StudentCommand<S> {
    pub fn new(store: S, seed_habits: Vec<String>) -> Self {
        Self { store, seed_habits }
    }

    /// Enroll a new student, optionally straight into a classroom.
    /// Requires the manage-students permission in the target classroom's
    /// org, or in the guide's active org when no classroom is given.
    pub fn run_enroll(
        &self,
        first_name: &str,
        last_name: &str,
        classroom_id: Option<Uuid>,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> StudentOutput {
        if let Err(denied) = self.require_enroll(classroom_id, guide_id) {
            return denied;
        }
        let service = StudentService::new(&self.store, &self.seed_habits);
        let student = match service.create(first_name, last_name, guide_id) {
            Ok(student) => student,
            Err(e) => return StudentOutput::failure(e.to_string()),
        };
        if let Some(classroom_id) = classroom_id {
            if let Err(e) =
                ClassroomService::new(&self.store).assign_student(classroom_id, student.id)
            {
                return StudentOutput::failure(e.to_string());
            }
        }
        StudentOutput::with_students(vec![student])
    }

    /// Apply a partial update to a student.
    pub fn run_update(
        &self,
        student_id: Uuid,
        update: StudentUpdate,
        _options: &OutputOptions,
    ) -> StudentOutput {
        match StudentService::new(&self.store, &self.seed_habits).update(student_id, update) {
            Ok(student) => StudentOutput::with_students(vec![student]),
            Err(e) => StudentOutput::failure(e.to_string()),
        }
    }

    /// List all students.
    pub fn run_list(&self, _options: &OutputOptions) -> StudentOutput {
        match StudentService::new(&self.store, &self.seed_habits).list() {
            Ok(students) => StudentOutput::with_students(students),
            Err(e) => StudentOutput::failure(e.to_string()),
        }
    }

    /// Attach a parent contact to a student.
    pub fn run_add_contact(
        &self,
        student_id: Uuid,
        full_name: &str,
        email: Option<String>,
        phone: Option<String>,
        _options: &OutputOptions,
    ) -> StudentOutput {
        let service = StudentService::new(&self.store, &self.seed_habits);
        match service.add_parent_contact(student_id, full_name, email, phone) {
            Ok(contact) => StudentOutput::with_contacts(vec![contact]),
            Err(e) => StudentOutput::failure(e.to_string()),
        }
    }

    /// List a student's parent contacts.
    pub fn run_contacts(&self, student_id: Uuid, _options: &OutputOptions) -> StudentOutput {
        match StudentService::new(&self.store, &self.seed_habits).parent_contacts(student_id) {
            Ok(contacts) => StudentOutput::with_contacts(contacts),
            Err(e) => StudentOutput::failure(e.to_string()),
        }
    }

    fn require_enroll(
        &self,
        classroom_id: Option<Uuid>,
        guide_id: Uuid,
    ) -> Result<(), StudentOutput> {
        let memberships = MembershipService::new(&self.store);
        let org_id = match classroom_id {
            Some(classroom_id) => match ClassroomService::new(&self.store).get(classroom_id) {
                Ok(room) => Some(room.org_id),
                Err(e) => return Err(StudentOutput::failure(e.to_string())),
            },
            None => memberships
                .memberships_of_guide(guide_id)
                .unwrap_or_default()
                .first()
                .map(|m| m.org_id),
        };
        let role =
            org_id.and_then(|org_id| memberships.role_of(org_id, guide_id).unwrap_or(None));
        match role {
            Some(role) if Action::ManageStudents.allows(role) => Ok(()),
            _ => Err(StudentOutput::failure("permission denied")),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StudentOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Student error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            let mut text = String::new();
            for student in &output.students {
                text.push_str(&format!("{}  {}\n", student.id, student.display_name));
            }
            for contact in &output.contacts {
                text.push_str(&format!(
                    "{}  {}{}\n",
                    contact.id,
                    contact.full_name,
                    contact
                        .email
                        .as_deref()
                        .map(|e| format!(" <{}>", e))
                        .unwrap_or_default()
                ));
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
    use crate::model::{Habit, Role};
    use crate::store::{MemoryStore, RecordStore};
    use std::sync::Arc;

    fn admin_of_new_org(store: &Arc<MemoryStore>) -> (Uuid, Uuid) {
        let org_id = Uuid::new_v4();
        let guide_id = Uuid::new_v4();
        MembershipService::new(store)
            .add(org_id, guide_id, Role::Admin)
            .unwrap();
        (org_id, guide_id)
    }

    #[test]
    fn test_enroll_into_classroom_with_seed_habits() {
        let store = Arc::new(MemoryStore::new());
        let command =
            StudentCommand::new(Arc::clone(&store), vec!["Attended class".to_string()]);
        let (org_id, guide_id) = admin_of_new_org(&store);
        let classroom = ClassroomService::new(&store)
            .create(org_id, "Primary A")
            .unwrap();

        let output = command.run_enroll(
            "Ada",
            "Lovelace",
            Some(classroom.id),
            guide_id,
            &OutputOptions::default(),
        );
        assert!(output.success);
        let student_id = output.students[0].id;

        let room = ClassroomService::new(&store).get(classroom.id).unwrap();
        assert!(room.has_student(student_id));

        let habits =
            RecordStore::<Habit>::find(&store, &|h: &Habit| h.student_id == student_id).unwrap();
        assert_eq!(habits.len(), 1);
    }

    #[test]
    fn test_enroll_requires_admin() {
        let store = Arc::new(MemoryStore::new());
        let command = StudentCommand::new(Arc::clone(&store), Vec::new());
        let (org_id, _) = admin_of_new_org(&store);
        let classroom = ClassroomService::new(&store)
            .create(org_id, "Primary A")
            .unwrap();
        let plain_guide = Uuid::new_v4();
        MembershipService::new(&store)
            .add(org_id, plain_guide, Role::Guide)
            .unwrap();

        let denied = command.run_enroll(
            "Ada",
            "Lovelace",
            Some(classroom.id),
            plain_guide,
            &OutputOptions::default(),
        );
        assert!(!denied.success);
        assert_eq!(denied.error.as_deref(), Some("permission denied"));

        // Same answer without a classroom: the active org's role decides
        let also_denied =
            command.run_enroll("Ada", "Lovelace", None, plain_guide, &OutputOptions::default());
        assert!(!also_denied.success);

        let no_org = command.run_enroll(
            "Ada",
            "Lovelace",
            None,
            Uuid::new_v4(),
            &OutputOptions::default(),
        );
        assert!(!no_org.success);
    }

    #[test]
    fn test_update_and_contacts() {
        let store = Arc::new(MemoryStore::new());
        let command = StudentCommand::new(Arc::clone(&store), Vec::new());
        let (_, guide_id) = admin_of_new_org(&store);
        let enrolled = command.run_enroll(
            "Ada",
            "Lovelace",
            None,
            guide_id,
            &OutputOptions::default(),
        );
        let student_id = enrolled.students[0].id;

        let updated = command.run_update(
            student_id,
            StudentUpdate {
                last_name: Some("Byron".to_string()),
                ..StudentUpdate::default()
            },
            &OutputOptions::default(),
        );
        assert_eq!(updated.students[0].display_name, "Ada Byron");

        command.run_add_contact(
            student_id,
            "Anne Byron",
            Some("anne@example.com".to_string()),
            None,
            &OutputOptions::default(),
        );
        let contacts = command.run_contacts(student_id, &OutputOptions::default());
        assert_eq!(contacts.contacts.len(), 1);
    }
}
