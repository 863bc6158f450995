//! Organization commands: create, rename, list, and member management.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::{Organization, Role};
use crate::services::{Action, MembershipService, OrgService};
use crate::store::Datastore;

/// One member row in the members listing.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRow {
    pub guide_id: Uuid,
    pub role: Role,
}

/// Output of the org commands.
#[derive(Debug, Clone, Serialize)]
pub struct OrgOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrgOutput {
    fn with_orgs(organizations: Vec<Organization>) -> Self {
        Self {
            success: true,
            organizations,
            members: Vec::new(),
            error: None,
        }
    }

    fn with_members(members: Vec<MemberRow>) -> Self {
        Self {
            success: true,
            organizations: Vec::new(),
            members,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            organizations: Vec::new(),
            members: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The org command implementation.
pub struct OrgCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> OrgCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an organization; the creating guide becomes its
    /// super-admin.
    pub fn run_create(&self, name: &str, guide_id: Uuid, _options: &OutputOptions) -> OrgOutput {
        let orgs = OrgService::new(&self.store);
        let org = match orgs.create(name) {
            Ok(org) => org,
            Err(e) => return OrgOutput::failure(e.to_string()),
        };
        if let Err(e) = MembershipService::new(&self.store).add(org.id, guide_id, Role::SuperAdmin)
        {
            return OrgOutput::failure(e.to_string());
        }
        OrgOutput::with_orgs(vec![org])
    }

    /// Rename an organization. Requires the manage-guides permission.
    pub fn run_rename(
        &self,
        org_id: Uuid,
        name: &str,
        guide_id: Uuid,
        _options: &OutputOptions,
    ) -> OrgOutput {
        if let Err(denied) = self.require(org_id, guide_id, Action::ManageGuides) {
            return denied;
        }
        match OrgService::new(&self.store).rename(org_id, name) {
            Ok(org) => OrgOutput::with_orgs(vec![org]),
            Err(e) => OrgOutput::failure(e.to_string()),
        }
    }

    /// List all organizations.
    pub fn run_list(&self, _options: &OutputOptions) -> OrgOutput {
        match OrgService::new(&self.store).list() {
            Ok(orgs) => OrgOutput::with_orgs(orgs),
            Err(e) => OrgOutput::failure(e.to_string()),
        }
    }

    /// List an organization's members.
    pub fn run_members(&self, org_id: Uuid, _options: &OutputOptions) -> OrgOutput {
        match MembershipService::new(&self.store).members_of(org_id) {
            Ok(memberships) => OrgOutput::with_members(
                memberships
                    .into_iter()
                    .map(|m| MemberRow {
                        guide_id: m.guide_id,
                        role: m.role,
                    })
                    .collect(),
            ),
            Err(e) => OrgOutput::failure(e.to_string()),
        }
    }

    /// Change a member's role. Requires the manage-guides permission.
    pub fn run_set_role(
        &self,
        org_id: Uuid,
        member_guide_id: Uuid,
        role: Role,
        acting_guide_id: Uuid,
        _options: &OutputOptions,
    ) -> OrgOutput {
        if let Err(denied) = self.require(org_id, acting_guide_id, Action::ManageGuides) {
            return denied;
        }
        match MembershipService::new(&self.store).update_role(org_id, member_guide_id, role) {
            Ok(m) => OrgOutput::with_members(vec![MemberRow {
                guide_id: m.guide_id,
                role: m.role,
            }]),
            Err(e) => OrgOutput::failure(e.to_string()),
        }
    }

    /// Remove a member. Requires the manage-guides permission.
    pub fn run_remove_member(
        &self,
        org_id: Uuid,
        member_guide_id: Uuid,
        acting_guide_id: Uuid,
        _options: &OutputOptions,
    ) -> OrgOutput {
        if let Err(denied) = self.require(org_id, acting_guide_id, Action::ManageGuides) {
            return denied;
        }
        match MembershipService::new(&self.store).remove(org_id, member_guide_id) {
            Ok(()) => OrgOutput::with_members(Vec::new()),
            Err(e) => OrgOutput::failure(e.to_string()),
        }
    }

    fn require(&self, org_id: Uuid, guide_id: Uuid, action: Action) -> Result<(), OrgOutput> {
        let role = MembershipService::new(&self.store)
            .role_of(org_id, guide_id)
            .unwrap_or(None);
        match role {
            Some(role) if action.allows(role) => Ok(()),
            _ => Err(OrgOutput::failure("permission denied")),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &OrgOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Org error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            let mut text = String::new();
            for org in &output.organizations {
                text.push_str(&format!("{}  {}\n", org.id, org.name));
            }
            for member in &output.members {
                text.push_str(&format!("{}  {}\n", member.guide_id, member.role.as_str()));
            }
            if text.is_empty() {
                text.push_str("(nothing to show)\n");
            }
            text
        })
    }
}
