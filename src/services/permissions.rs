//! Role-based permission checks.
//!
//! Permissions are a flat (action, role) table. There is no hierarchy
//! arithmetic; each action lists the roles allowed to perform it.

use crate::model::Role;

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Add, remove, or change the role of guides in an organization.
    ManageGuides,
    /// Enroll, update, or remove students.
    ManageStudents,
    /// Create, update, or delete classrooms and rosters.
    ManageClassrooms,
    /// Issue or revoke invites.
    ManageInvites,
}

impl Action {
    /// Whether a role may perform this action.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Action::ManageGuides => matches!(role, Role::SuperAdmin),
            Action::ManageStudents | Action::ManageClassrooms | Action::ManageInvites => {
                matches!(role, Role::SuperAdmin | Role::Admin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_guides_is_super_admin_only() {
        assert!(Action::ManageGuides.allows(Role::SuperAdmin));
        assert!(!Action::ManageGuides.allows(Role::Admin));
        assert!(!Action::ManageGuides.allows(Role::Guide));
    }

    #[test]
    fn test_admin_actions() {
        for action in [
            Action::ManageStudents,
            Action::ManageClassrooms,
            Action::ManageInvites,
        ] {
            assert!(action.allows(Role::SuperAdmin));
            assert!(action.allows(Role::Admin));
            assert!(!action.allows(Role::Guide));
        }
    }
}
