//! Classroom commands: create, list, and roster assignment.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::Classroom;
use crate::services::{Action, ClassroomService, MembershipService};
use crate::store::Datastore;

/// Output of the classroom commands.
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classrooms: Vec<Classroom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassroomOutput {
    fn with_classrooms(classrooms: Vec<Classroom>) -> Self {
        Self {
            success: true,
            classrooms,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            classrooms: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The classroom command implementation.
pub struct ClassroomCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> ClassroomCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a classroom, assigning the creating guide to it.
    /// Requires the manage-classrooms permission.
    pub fn run_create(
        &self,
        org_id: Uuid,
        name: &str,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> ClassroomOutput {
        if let Err(denied) = self.require(org_id, guide_id) {
            return denied;
        }
        let service = ClassroomService::new(&self.store);
        let classroom = match service.create(org_id, name) {
            Ok(room) => room,
            Err(e) => return ClassroomOutput::failure(e.to_string()),
        };
        match service.assign_guide(classroom.id, guide_id) {
            Ok(room) => ClassroomOutput::with_classrooms(vec![room]),
            Err(e) => ClassroomOutput::failure(e.to_string()),
        }
    }

    /// List classrooms in an organization.
    pub fn run_list(&self, org_id: Uuid, _options: &OutputOptions) -> ClassroomOutput {
        match ClassroomService::new(&self.store).list_for_org(org_id) {
            Ok(rooms) => ClassroomOutput::with_classrooms(rooms),
            Err(e) => ClassroomOutput::failure(e.to_string()),
        }
    }

    /// Enroll a student in a classroom.
    /// Requires the manage-classrooms permission in the classroom's org.
    pub fn run_enroll(
        &self,
        classroom_id: Uuid,
        student_id: Uuid,
        acting_guide_id: Uuid,
        _options: &OutputOptions,
    ) -> ClassroomOutput {
        if let Err(denied) = self.require_for_classroom(classroom_id, acting_guide_id) {
            return denied;
        }
        match ClassroomService::new(&self.store).assign_student(classroom_id, student_id) {
            Ok(room) => ClassroomOutput::with_classrooms(vec![room]),
            Err(e) => ClassroomOutput::failure(e.to_string()),
        }
    }

    /// Remove a student from a classroom roster.
    /// Requires the manage-classrooms permission in the classroom's org.
    pub fn run_unenroll(
        &self,
        classroom_id: Uuid,
        student_id: Uuid,
        acting_guide_id: Uuid,
        _options: &OutputOptions,
    ) -> ClassroomOutput {
        if let Err(denied) = self.require_for_classroom(classroom_id, acting_guide_id) {
            return denied;
        }
        match ClassroomService::new(&self.store).unassign_student(classroom_id, student_id) {
            Ok(room) => ClassroomOutput::with_classrooms(vec![room]),
            Err(e) => ClassroomOutput::failure(e.to_string()),
        }
    }

    /// Assign a guide to a classroom.
    /// Requires the manage-classrooms permission in the classroom's org.
    pub fn run_assign_guide(
        &self,
        classroom_id: Uuid,
        guide_id: Uuid,
        acting_guide_id: Uuid,
        _options: &OutputOptions,
    ) -> ClassroomOutput {
        if let Err(denied) = self.require_for_classroom(classroom_id, acting_guide_id) {
            return denied;
        }
        match ClassroomService::new(&self.store).assign_guide(classroom_id, guide_id) {
            Ok(room) => ClassroomOutput::with_classrooms(vec![room]),
            Err(e) => ClassroomOutput::failure(e.to_string()),
        }
    }

    fn require(&self, org_id: Uuid, guide_id: Uuid) -> Result<(), ClassroomOutput> {
        let role = MembershipService::new(&self.store)
            .role_of(org_id, guide_id)
            .unwrap_or(None);
        match role {
            Some(role) if Action::ManageClassrooms.allows(role) => Ok(()),
            _ => Err(ClassroomOutput::failure("permission denied")),
        }
    }

    fn require_for_classroom(
        &self,
        classroom_id: Uuid,
        guide_id: Uuid,
    ) -> Result<(), ClassroomOutput> {
        let classroom = match ClassroomService::new(&self.store).get(classroom_id) {
            Ok(room) => room,
            Err(e) => return Err(ClassroomOutput::failure(e.to_string())),
        };
        self.require(classroom.org_id, guide_id)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ClassroomOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Classroom error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if output.classrooms.is_empty() {
                return "No classrooms.\n".to_string();
            }
            let mut text = String::new();
            for room in &output.classrooms {
                text.push_str(&format!(
                    "{}  {} ({} students, {} guides)\n",
                    room.id,
                    room.name,
                    room.student_ids.len(),
                    room.guide_ids.len()
                ));
            }
            text
        })
    }
}
