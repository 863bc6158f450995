//! Organization membership management.

use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Membership, Role};
use crate::store::{Datastore, RecordStore};

/// Manage guide memberships within organizations.
pub struct MembershipService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> MembershipService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All memberships in an organization.
    pub fn members_of(&self, org_id: Uuid) -> Result<Vec<Membership>> {
        RecordStore::<Membership>::find(self.store, &|m: &Membership| m.org_id == org_id)
    }

    /// All memberships held by a guide, oldest first.
    pub fn memberships_of_guide(&self, guide_id: Uuid) -> Result<Vec<Membership>> {
        let mut memberships = RecordStore::<Membership>::find(self.store, &|m: &Membership| {
            m.guide_id == guide_id
        })?;
        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    /// The guide's role in an organization, if they are a member.
    pub fn role_of(&self, org_id: Uuid, guide_id: Uuid) -> Result<Option<Role>> {
        let membership = self.find_membership(org_id, guide_id)?;
        Ok(membership.map(|m| m.role))
    }

    /// Add a guide to an organization at a role.
    ///
    /// Adding an existing member returns the existing membership
    /// unchanged.
    pub fn add(&self, org_id: Uuid, guide_id: Uuid, role: Role) -> Result<Membership> {
        if let Some(existing) = self.find_membership(org_id, guide_id)? {
            return Ok(existing);
        }
        let membership = Membership::new(org_id, guide_id, role);
        self.store.put(&membership)?;
        tracing::debug!(
            "added guide {} to org {} as {}",
            guide_id,
            org_id,
            role.as_str()
        );
        Ok(membership)
    }

    /// Remove a guide from an organization.
    pub fn remove(&self, org_id: Uuid, guide_id: Uuid) -> Result<()> {
        let membership = self.find_membership(org_id, guide_id)?.ok_or_else(|| {
            PinkTowerError::not_found(format!("membership of guide {} in org {}", guide_id, org_id))
        })?;
        RecordStore::<Membership>::delete(self.store, membership.id)
    }

    /// Change a guide's role in an organization.
    pub fn update_role(&self, org_id: Uuid, guide_id: Uuid, role: Role) -> Result<Membership> {
        let mut membership = self.find_membership(org_id, guide_id)?.ok_or_else(|| {
            PinkTowerError::not_found(format!("membership of guide {} in org {}", guide_id, org_id))
        })?;
        membership.role = role;
        self.store.put(&membership)?;
        Ok(membership)
    }

    fn find_membership(&self, org_id: Uuid, guide_id: Uuid) -> Result<Option<Membership>> {
        RecordStore::<Membership>::find_first(self.store, &|m: &Membership| {
            m.org_id == org_id && m.guide_id == guide_id
        })
    }
}
