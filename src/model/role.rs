//! Organization roles.

use serde::{Deserialize, Serialize};

/// A guide's role, both on the guide record itself and within an
/// organization membership.
///
/// Roles are compared by equality; permission decisions live in a flat
/// (action, role) table in `services::permissions`, not in dynamic
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    Guide,
}

impl Role {
    /// All roles, highest privilege first.
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::Guide];

    /// Stable string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superAdmin",
            Role::Admin => "admin",
            Role::Guide => "guide",
        }
    }

    /// Parse from the stable string form. Unknown values map to `None`.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "superAdmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "guide" => Some(Role::Guide),
            _ => None,
        }
    }
}
