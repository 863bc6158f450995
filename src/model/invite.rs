//! Single-use organization invites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Role;

/// A single-use code granting organization membership at a role.
///
/// Redemption is guarded by `redeemed_at == None`: the first redeem
/// stamps it, every later attempt sees the code as gone. Revoking an
/// invite deletes the record outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invite {
    /// Unique invite identifier.
    pub id: Uuid,
    /// The organization the invite grants membership in.
    pub org_id: Uuid,
    /// The shareable code.
    pub code: String,
    /// The role granted on redemption.
    pub role: Role,
    /// The guide who created the invite.
    pub created_by_guide_id: Uuid,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
    /// When the invite stops being redeemable, if ever.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the invite was redeemed, if it has been.
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl Invite {
    /// Create a new invite with a generated code.
    pub fn new(org_id: Uuid, role: Role, created_by_guide_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            code: Uuid::new_v4().to_string(),
            role,
            created_by_guide_id,
            created_at: Utc::now(),
            expires_at: None,
            redeemed_at: None,
        }
    }

    /// Set an expiry time.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the invite can still be redeemed at the given time.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if self.redeemed_at.is_some() {
            return false;
        }
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }
}
