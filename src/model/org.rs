//! Organizations and guide memberships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Role;

/// Top-level tenant grouping classrooms and guides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name (e.g. the school name).
    pub name: String,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A guide's role within a specific organization.
///
/// Links `Guide` to `Organization`; a guide may hold memberships in
/// several organizations, each with its own role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The organization this membership belongs to.
    pub org_id: Uuid,
    /// The guide this membership belongs to.
    pub guide_id: Uuid,
    /// The guide's role within the organization.
    pub role: Role,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Create a new membership.
    pub fn new(org_id: Uuid, guide_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            guide_id,
            role,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_organization() {
        let org = Organization::new("Casa dei Bambini");
        assert_eq!(org.name, "Casa dei Bambini");
        assert!(!org.id.is_nil());
    }

    #[test]
    fn test_new_membership() {
        let org = Organization::new("My School");
        let guide_id = Uuid::new_v4();
        let m = Membership::new(org.id, guide_id, Role::SuperAdmin);
        assert_eq!(m.org_id, org.id);
        assert_eq!(m.guide_id, guide_id);
        assert_eq!(m.role, Role::SuperAdmin);
    }
}
