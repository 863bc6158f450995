//! Observation recording and querying.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::StudentObservation;
use crate::store::{Datastore, RecordStore};

/// Filters for observation queries; unset fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ObservationQuery {
    /// Match observations about or tagging this student.
    pub student_id: Option<Uuid>,
    /// Match the subject tag exactly.
    pub subject_tag: Option<String>,
    /// Match the material tag exactly.
    pub material_tag: Option<String>,
    /// Case-insensitive substring match on content.
    pub content_contains: Option<String>,
    /// Written at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Written before this time.
    pub until: Option<DateTime<Utc>>,
}

impl ObservationQuery {
    fn matches(&self, obs: &StudentObservation) -> bool {
        if let Some(student_id) = self.student_id {
            if obs.primary_student_id != student_id
                && !obs.tagged_student_ids.contains(&student_id)
            {
                return false;
            }
        }
        if let Some(subject) = &self.subject_tag {
            if obs.subject_tag.as_deref() != Some(subject.as_str()) {
                return false;
            }
        }
        if let Some(material) = &self.material_tag {
            if obs.material_tag.as_deref() != Some(material.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.content_contains {
            if !obs.content.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if obs.created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if obs.created_at >= until {
                return false;
            }
        }
        true
    }
}

/// Record and search student observations.
pub struct ObservationService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> ObservationService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record an observation.
    pub fn create(&self, observation: StudentObservation) -> Result<StudentObservation> {
        if observation.content.trim().is_empty() {
            return Err(PinkTowerError::invalid_input(
                "observation content cannot be empty",
            ));
        }
        self.store.put(&observation)?;
        Ok(observation)
    }

    /// Fetch an observation by id.
    pub fn get(&self, id: Uuid) -> Result<StudentObservation> {
        let obs: Option<StudentObservation> = self.store.get(id)?;
        obs.ok_or_else(|| PinkTowerError::not_found(format!("observation {}", id)))
    }

    /// Search observations, newest first.
    pub fn query(&self, query: &ObservationQuery) -> Result<Vec<StudentObservation>> {
        let mut matches = RecordStore::<StudentObservation>::find(
            self.store,
            &|o: &StudentObservation| query.matches(o),
        )?;
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    /// Delete an observation.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        RecordStore::<StudentObservation>::delete(self.store, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_create_rejects_empty_content() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let obs = StudentObservation::new(Uuid::new_v4(), "   ", Uuid::new_v4());
        assert!(service.create(obs).is_err());
    }

    #[test]
    fn test_query_by_student_includes_tagged() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let primary = Uuid::new_v4();
        let tagged = Uuid::new_v4();
        let guide_id = Uuid::new_v4();

        service
            .create(
                StudentObservation::new(primary, "Worked with the red rods", guide_id)
                    .with_tagged_students(vec![tagged]),
            )
            .unwrap();
        service
            .create(StudentObservation::new(Uuid::new_v4(), "Unrelated", guide_id))
            .unwrap();

        let for_primary = service
            .query(&ObservationQuery {
                student_id: Some(primary),
                ..ObservationQuery::default()
            })
            .unwrap();
        assert_eq!(for_primary.len(), 1);

        let for_tagged = service
            .query(&ObservationQuery {
                student_id: Some(tagged),
                ..ObservationQuery::default()
            })
            .unwrap();
        assert_eq!(for_tagged.len(), 1);
    }

    #[test]
    fn test_query_by_tags_and_content() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let guide_id = Uuid::new_v4();

        service
            .create(
                StudentObservation::new(Uuid::new_v4(), "Chose the Pink Tower", guide_id)
                    .with_subject_tag("sensorial")
                    .with_material_tag("pink tower"),
            )
            .unwrap();
        service
            .create(
                StudentObservation::new(Uuid::new_v4(), "Practiced pouring", guide_id)
                    .with_subject_tag("practical life"),
            )
            .unwrap();

        let sensorial = service
            .query(&ObservationQuery {
                subject_tag: Some("sensorial".to_string()),
                ..ObservationQuery::default()
            })
            .unwrap();
        assert_eq!(sensorial.len(), 1);

        let by_content = service
            .query(&ObservationQuery {
                content_contains: Some("pink tower".to_string()),
                ..ObservationQuery::default()
            })
            .unwrap();
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].material_tag.as_deref(), Some("pink tower"));
    }

    #[test]
    fn test_query_newest_first() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let guide_id = Uuid::new_v4();
        let student = Uuid::new_v4();

        let mut older = StudentObservation::new(student, "Earlier", guide_id);
        older.created_at = Utc::now() - chrono::Duration::hours(2);
        service.create(older).unwrap();
        service
            .create(StudentObservation::new(student, "Later", guide_id))
            .unwrap();

        let all = service.query(&ObservationQuery::default()).unwrap();
        assert_eq!(all[0].content, "Later");
        assert_eq!(all[1].content, "Earlier");
    }

    #[test]
    fn test_query_date_window() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let guide_id = Uuid::new_v4();

        let mut old = StudentObservation::new(Uuid::new_v4(), "Old", guide_id);
        old.created_at = Utc::now() - chrono::Duration::days(10);
        service.create(old).unwrap();
        service
            .create(StudentObservation::new(Uuid::new_v4(), "Recent", guide_id))
            .unwrap();

        let recent = service
            .query(&ObservationQuery {
                since: Some(Utc::now() - chrono::Duration::days(1)),
                ..ObservationQuery::default()
            })
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].content, "Recent");
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let service = ObservationService::new(&store);
        let obs = service
            .create(StudentObservation::new(Uuid::new_v4(), "Note", Uuid::new_v4()))
            .unwrap();

        service.delete(obs.id).unwrap();
        assert!(service.get(obs.id).unwrap_err().is_not_found());
    }
}
