//! Guide (staff user) CRUD.

use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Guide, Role};
use crate::store::{Datastore, RecordStore};

/// Fields of a guide that can be updated; `None` leaves a field as-is.
#[derive(Debug, Default, Clone)]
pub struct GuideUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub default_classroom_id: Option<Option<Uuid>>,
}

/// Create, update, and delete guide records.
pub struct GuideService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> GuideService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new guide bound to a device identity key.
    pub fn create(&self, user_key: &str, full_name: &str) -> Result<Guide> {
        let user_key = user_key.trim();
        let full_name = full_name.trim();
        if user_key.is_empty() {
            return Err(PinkTowerError::invalid_input("user key cannot be empty"));
        }
        if full_name.is_empty() {
            return Err(PinkTowerError::invalid_input("guide name cannot be empty"));
        }
        if self.find_by_user_key(user_key)?.is_some() {
            return Err(PinkTowerError::invalid_input(format!(
                "a guide already exists for key {}",
                user_key
            )));
        }
        let guide = Guide::new(user_key, full_name);
        self.store.put(&guide)?;
        Ok(guide)
    }

    /// Fetch a guide by id.
    pub fn get(&self, id: Uuid) -> Result<Guide> {
        let guide: Option<Guide> = self.store.get(id)?;
        guide.ok_or_else(|| PinkTowerError::not_found(format!("guide {}", id)))
    }

    /// Look up a guide by device identity key.
    pub fn find_by_user_key(&self, user_key: &str) -> Result<Option<Guide>> {
        RecordStore::<Guide>::find_first(self.store, &|g: &Guide| g.user_key == user_key)
    }

    /// Apply a partial update to a guide.
    pub fn update(&self, id: Uuid, update: GuideUpdate) -> Result<Guide> {
        let mut guide = self.get(id)?;
        if let Some(full_name) = update.full_name {
            let full_name = full_name.trim().to_string();
            if full_name.is_empty() {
                return Err(PinkTowerError::invalid_input("guide name cannot be empty"));
            }
            guide.full_name = full_name;
        }
        if let Some(email) = update.email {
            guide.email = Some(email);
        }
        if let Some(role) = update.role {
            guide.role = role;
        }
        if let Some(default_classroom_id) = update.default_classroom_id {
            guide.default_classroom_id = default_classroom_id;
        }
        self.store.put(&guide)?;
        Ok(guide)
    }

    /// Delete a guide record. Memberships and classroom assignments are
    /// left in place.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        RecordStore::<Guide>::delete(self.store, id)
    }

    /// All guides, sorted by name.
    pub fn list(&self) -> Result<Vec<Guide>> {
        let mut guides: Vec<Guide> = self.store.list()?;
        guides.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));
        Ok(guides)
    }
}
