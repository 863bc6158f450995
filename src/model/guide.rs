//! Guide (staff user) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Role;

/// A staff user of the application (teacher or administrator).
///
/// Identified across sessions by `user_key`, the opaque device identity
/// string produced by the sign-in flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guide {
    /// Unique guide identifier.
    pub id: Uuid,
    /// Opaque device-identity key this guide record is bound to.
    pub user_key: String,
    /// Full display name.
    pub full_name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Default role for new memberships.
    pub role: Role,
    /// Last selected classroom, restored on session load.
    pub default_classroom_id: Option<Uuid>,
    /// Optional avatar image location.
    pub avatar_url: Option<String>,
    /// When the guide record was created.
    pub created_at: DateTime<Utc>,
}

impl Guide {
    /// Create a new guide bound to a device identity key.
    pub fn new(user_key: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_key: user_key.into(),
            full_name: full_name.into(),
            email: None,
            role: Role::Guide,
            default_classroom_id: None,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guide_defaults() {
        let guide = Guide::new("device-key-1", "Maria Montessori");
        assert_eq!(guide.user_key, "device-key-1");
        assert_eq!(guide.full_name, "Maria Montessori");
        assert_eq!(guide.role, Role::Guide);
        assert!(guide.email.is_none());
        assert!(guide.default_classroom_id.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let guide = Guide::new("k", "A Guide")
            .with_email("guide@example.com")
            .with_role(Role::Admin);
        assert_eq!(guide.email.as_deref(), Some("guide@example.com"));
        assert_eq!(guide.role, Role::Admin);
    }
}
