//! Invite commands: create, list, revoke, redeem.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::{Invite, Role};
use crate::services::{Action, InviteService, MembershipService};
use crate::store::Datastore;

/// Output of the invite commands.
#[derive(Debug, Clone, Serialize)]
pub struct InviteOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invites: Vec<Invite>,
    /// The org joined on a successful redeem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_org_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InviteOutput {
    fn with_invites(invites: Vec<Invite>) -> Self {
        Self {
            success: true,
            invites,
            joined_org_id: None,
            error: None,
        }
    }

    fn joined(org_id: Uuid) -> Self {
        Self {
            success: true,
            invites: Vec::new(),
            joined_org_id: Some(org_id),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            invites: Vec::new(),
            joined_org_id: None,
            error: Some(error.into()),
        }
    }
}

/// The invite command implementation.
pub struct InviteCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> InviteCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issue an invite. Requires the manage-invites permission.
    pub fn run_create(
        &self,
        org_id: Uuid,
        role: Role,
        guide_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
        _options: &OutputOptions,
    ) -> InviteOutput {
        if let Err(denied) = self.require(org_id, guide_id, Action::ManageInvites) {
            return denied;
        }
        match InviteService::new(&self.store).create(org_id, role, guide_id, expires_at) {
            Ok(invite) => InviteOutput::with_invites(vec![invite]),
            Err(e) => InviteOutput::failure(e.to_string()),
        }
    }

    /// List an organization's open invites.
    pub fn run_list(&self, org_id: Uuid, _options: &OutputOptions) -> InviteOutput {
        match InviteService::new(&self.store).list_open(org_id, Utc::now()) {
            Ok(invites) => InviteOutput::with_invites(invites),
            Err(e) => InviteOutput::failure(e.to_string()),
        }
    }

    /// Revoke an invite. Requires the manage-invites permission.
    pub fn run_revoke(
        &self,
        org_id: Uuid,
        invite_id: Uuid,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> InviteOutput {
        if let Err(denied) = self.require(org_id, guide_id, Action::ManageInvites) {
            return denied;
        }
        match InviteService::new(&self.store).revoke(invite_id) {
            Ok(()) => InviteOutput::with_invites(Vec::new()),
            Err(e) => InviteOutput::failure(e.to_string()),
        }
    }

    /// Redeem an invite code for the signed-in guide. This is the
    /// join-organization flow.
    pub fn run_redeem(&self, code: &str, guide_id: Uuid, _options: &OutputOptions) -> InviteOutput {
        match InviteService::new(&self.store).redeem(code, guide_id, Utc::now()) {
            Ok(membership) => InviteOutput::joined(membership.org_id),
            Err(e) => InviteOutput::failure(e.to_string()),
        }
    }

    fn require(&self, org_id: Uuid, guide_id: Uuid, action: Action) -> Result<(), InviteOutput> {
        let role = MembershipService::new(&self.store)
            .role_of(org_id, guide_id)
            .unwrap_or(None);
        match role {
            Some(role) if action.allows(role) => Ok(()),
            _ => Err(InviteOutput::failure("permission denied")),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InviteOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Invite error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if let Some(org_id) = output.joined_org_id {
                return format!("Joined organization {}\n", org_id);
            }
            if output.invites.is_empty() {
                return "No open invites.\n".to_string();
            }
            let mut text = String::new();
            for invite in &output.invites {
                text.push_str(&format!("{}  {}\n", invite.code, invite.role.as_str()));
            }
            text
        })
    }
}
