//! Organization invites: create, list, revoke, redeem.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PinkTowerError, Result};
use crate::model::{Invite, Membership, Role};
use crate::store::{Datastore, RecordStore};

/// Issue and redeem single-use organization invites.
pub struct InviteService<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> InviteService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Issue a new invite with a generated code.
    pub fn create(
        &self,
        org_id: Uuid,
        role: Role,
        created_by: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Invite> {
        let mut invite = Invite::new(org_id, role, created_by);
        invite.expires_at = expires_at;
        self.store.put(&invite)?;
        tracing::debug!("issued {} invite for org {}", role.as_str(), org_id);
        Ok(invite)
    }

    /// Invites for an organization that are still redeemable at `now`.
    pub fn list_open(&self, org_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Invite>> {
        let mut invites = RecordStore::<Invite>::find(self.store, &|i: &Invite| {
            i.org_id == org_id && i.is_open(now)
        })?;
        invites.sort_by_key(|i| i.created_at);
        Ok(invites)
    }

    /// Revoke an invite by deleting it outright.
    pub fn revoke(&self, id: Uuid) -> Result<()> {
        RecordStore::<Invite>::delete(self.store, id)
    }

    /// Redeem an invite code for a guide.
    ///
    /// Succeeds at most once per code: the invite is stamped with
    /// `redeemed_at` and a membership at the invite's role is created.
    /// Unknown, already-redeemed, and expired codes all fail with
    /// `NotFound`; callers cannot distinguish the three.
    pub fn redeem(&self, code: &str, guide_id: Uuid, now: DateTime<Utc>) -> Result<Membership> {
        let invite = RecordStore::<Invite>::find_first(self.store, &|i: &Invite| i.code == code)?
            .filter(|i| i.is_open(now))
            .ok_or_else(|| PinkTowerError::not_found(format!("invite code {}", code)))?;

        let mut redeemed = invite;
        redeemed.redeemed_at = Some(now);
        self.store.put(&redeemed)?;

        let membership = Membership::new(redeemed.org_id, guide_id, redeemed.role);
        self.store.put(&membership)?;
        tracing::debug!(
            "guide {} joined org {} via invite",
            guide_id,
            redeemed.org_id
        );
        Ok(membership)
    }
}
