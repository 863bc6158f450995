//! Observation commands: record, search, delete.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::StudentObservation;
use crate::services::{ObservationQuery, ObservationService};
use crate::store::Datastore;

/// Output of the observe commands.
#[derive(Debug, Clone, Serialize)]
pub struct ObserveOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<StudentObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ObserveOutput {
    fn with_observations(observations: Vec<StudentObservation>) -> Self {
        Self {
            success: true,
            observations,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            observations: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The observe command implementation.
pub struct ObserveCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> ObserveCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record an observation about a student.
    #[allow(clippy::too_many_arguments)]
    pub fn run_add(
        &self,
        student_id: Uuid,
        content: &str,
        subject_tag: Option<String>,
        material_tag: Option<String>,
        tagged_student_ids: Vec<Uuid>,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> ObserveOutput {
        let mut obs = StudentObservation::new(student_id, content, guide_id);
        if let Some(subject) = subject_tag {
            obs = obs.with_subject_tag(subject);
        }
        if let Some(material) = material_tag {
            obs = obs.with_material_tag(material);
        }
        if !tagged_student_ids.is_empty() {
            obs = obs.with_tagged_students(tagged_student_ids);
        }
        match ObservationService::new(&self.store).create(obs) {
            Ok(saved) => ObserveOutput::with_observations(vec![saved]),
            Err(e) => ObserveOutput::failure(e.to_string()),
        }
    }

    /// Search observations, newest first.
    pub fn run_search(&self, query: &ObservationQuery, _options: &OutputOptions) -> ObserveOutput {
        match ObservationService::new(&self.store).query(query) {
            Ok(observations) => ObserveOutput::with_observations(observations),
            Err(e) => ObserveOutput::failure(e.to_string()),
        }
    }

    /// Delete an observation.
    pub fn run_delete(&self, id: Uuid, _options: &OutputOptions) -> ObserveOutput {
        match ObservationService::new(&self.store).delete(id) {
            Ok(()) => ObserveOutput::with_observations(Vec::new()),
            Err(e) => ObserveOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ObserveOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Observation error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if output.observations.is_empty() {
                return "No observations.\n".to_string();
            }
            let mut text = String::new();
            for obs in &output.observations {
                let mut tags = Vec::new();
                if let Some(subject) = &obs.subject_tag {
                    tags.push(subject.clone());
                }
                if let Some(material) = &obs.material_tag {
                    tags.push(material.clone());
                }
                let tag_text = if tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", tags.join(", "))
                };
                text.push_str(&format!(
                    "{}  {}{}\n    {}\n",
                    obs.created_at.date_naive(),
                    obs.id,
                    tag_text,
                    obs.content
                ));
            }
            text
        })
    }
}
