//! Organization CRUD.

use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::Organization;
use crate::store::{Datastore, RecordStore};

/// Create, rename, and list organizations.
pub struct OrgService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> OrgService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new organization.
    pub fn create(&self, name: &str) -> Result<Organization> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinkTowerError::invalid_input(
                "organization name cannot be empty",
            ));
        }
        let org = Organization::new(name);
        self.store.put(&org)?;
        tracing::debug!("created organization {} ({})", org.name, org.id);
        Ok(org)
    }

    /// Fetch an organization by id.
    pub fn get(&self, id: Uuid) -> Result<Organization> {
        let org: Option<Organization> = self.store.get(id)?;
        org.ok_or_else(|| PinkTowerError::not_found(format!("organization {}", id)))
    }

    /// Rename an organization.
    pub fn rename(&self, id: Uuid, name: &str) -> Result<Organization> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinkTowerError::invalid_input(
                "organization name cannot be empty",
            ));
        }
        let mut org = self.get(id)?;
        org.name = name.to_string();
        self.store.put(&org)?;
        Ok(org)
    }

    /// All organizations, sorted by name.
    pub fn list(&self) -> Result<Vec<Organization>> {
        let mut orgs: Vec<Organization> = self.store.list()?;
        orgs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(orgs)
    }
}
