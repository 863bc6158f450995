//! Session routing: which screen the app should show.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{FailOpen, Result};
use crate::model::{Classroom, Guide, Membership, Organization, Role};
use crate::services::MembershipService;
use crate::store::{Datastore, RecordStore};

/// The top-level route the app presents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "camelCase")]
pub enum AppRoute {
    /// No device identity; the sign-in screen.
    SignIn,
    /// Signed in but not a member of any organization.
    PromptCreateOrganization,
    /// Entered only by explicit user choice (redeeming an invite);
    /// never produced by route recomputation.
    PromptJoinOrganization,
    /// A member of an organization with no classrooms yet.
    PromptCreateClassroom,
    /// The main board. `classroom_id` is set when the active
    /// organization has exactly one classroom.
    Main { classroom_id: Option<Uuid> },
}

/// Computes the app route from the store.
///
/// Routing is read-mostly: the only mutation it performs is creating a
/// default guide record for a fresh identity key. Every store failure
/// degrades to `SignIn`; the router never surfaces an error.
pub struct SessionRouter<'a, S: Datastore> {
    store: &'a S,
}

impl<'a, S: Datastore> SessionRouter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Determine the route for the given device identity.
    pub fn determine_route(&self, identity: Option<&str>) -> AppRoute {
        let user_key = match identity {
            Some(key) if !key.trim().is_empty() => key,
            _ => return AppRoute::SignIn,
        };
        self.route_for_key(user_key)
            .fail_open_with("determining route", AppRoute::SignIn)
    }

    fn route_for_key(&self, user_key: &str) -> Result<AppRoute> {
        let guide = self.get_or_create_guide(user_key)?;

        let memberships = self.memberships_for(guide.id)?;
        let Some(active) = memberships.first() else {
            return Ok(AppRoute::PromptCreateOrganization);
        };

        let org_id = active.org_id;
        let classrooms = RecordStore::<Classroom>::find(self.store, &|c: &Classroom| {
            c.org_id == org_id
        })?;

        match classrooms.as_slice() {
            [] => Ok(AppRoute::PromptCreateClassroom),
            [only] => Ok(AppRoute::Main {
                classroom_id: Some(only.id),
            }),
            _ => Ok(AppRoute::Main { classroom_id: None }),
        }
    }

    /// Resolve the guide for an identity key, creating a default record
    /// named "Guide" the first time a key is seen.
    pub fn get_or_create_guide(&self, user_key: &str) -> Result<Guide> {
        let existing =
            RecordStore::<Guide>::find_first(self.store, &|g: &Guide| g.user_key == user_key)?;
        if let Some(guide) = existing {
            return Ok(guide);
        }
        let guide = Guide::new(user_key, "Guide");
        self.store.put(&guide)?;
        tracing::debug!("created guide record for new identity key");
        Ok(guide)
    }

    /// The guide's active organization: the org of their oldest
    /// membership. There is no persisted active-org selection.
    pub fn active_org_id(&self, guide_id: Uuid) -> Result<Option<Uuid>> {
        Ok(self.memberships_for(guide_id)?.first().map(|m| m.org_id))
    }

    /// Create a default organization and a super-admin membership for a
    /// guide with no memberships. Returns the active org id either way.
    pub fn ensure_org_bootstrap(&self, guide_id: Uuid, default_name: &str) -> Result<Uuid> {
        if let Some(org_id) = self.active_org_id(guide_id)? {
            return Ok(org_id);
        }
        let org = Organization::new(default_name);
        self.store.put(&org)?;
        let membership = Membership::new(org.id, guide_id, Role::SuperAdmin);
        self.store.put(&membership)?;
        tracing::debug!("bootstrapped organization {} for guide {}", org.id, guide_id);
        Ok(org.id)
    }

    fn memberships_for(&self, guide_id: Uuid) -> Result<Vec<Membership>> {
        MembershipService::new(self.store).memberships_of_guide(guide_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn signed_in_guide(store: &MemoryStore, key: &str) -> Guide {
        let router = SessionRouter::new(store);
        router.get_or_create_guide(key).unwrap()
    }

    #[test]
    fn test_no_identity_routes_sign_in() {
        let store = MemoryStore::new();
        let router = SessionRouter::new(&store);
        assert_eq!(router.determine_route(None), AppRoute::SignIn);
        assert_eq!(router.determine_route(Some("  ")), AppRoute::SignIn);
    }

    #[test]
    fn test_fresh_identity_creates_default_guide() {
        let store = MemoryStore::new();
        let router = SessionRouter::new(&store);

        let route = router.determine_route(Some("device-1"));
        assert_eq!(route, AppRoute::PromptCreateOrganization);

        let guide = RecordStore::<Guide>::find_first(&store, &|g: &Guide| {
            g.user_key == "device-1"
        })
        .unwrap()
        .unwrap();
        assert_eq!(guide.full_name, "Guide");

        // Routing again reuses the record
        router.determine_route(Some("device-1"));
        let guides: Vec<Guide> = store.list().unwrap();
        assert_eq!(guides.len(), 1);
    }

    #[test]
    fn test_zero_memberships_prompts_create_organization() {
        let store = MemoryStore::new();
        signed_in_guide(&store, "device-1");
        let router = SessionRouter::new(&store);
        assert_eq!(
            router.determine_route(Some("device-1")),
            AppRoute::PromptCreateOrganization
        );
    }

    #[test]
    fn test_member_without_classrooms_prompts_create_classroom() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");
        let org = Organization::new("My School");
        store.put(&org).unwrap();
        store
            .put(&Membership::new(org.id, guide.id, Role::SuperAdmin))
            .unwrap();

        let router = SessionRouter::new(&store);
        assert_eq!(
            router.determine_route(Some("device-1")),
            AppRoute::PromptCreateClassroom
        );
    }

    #[test]
    fn test_single_classroom_routes_main_with_selection() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");
        let org = Organization::new("My School");
        store.put(&org).unwrap();
        store
            .put(&Membership::new(org.id, guide.id, Role::SuperAdmin))
            .unwrap();
        let classroom = Classroom::new(org.id, "Primary A");
        store.put(&classroom).unwrap();

        let router = SessionRouter::new(&store);
        assert_eq!(
            router.determine_route(Some("device-1")),
            AppRoute::Main {
                classroom_id: Some(classroom.id)
            }
        );
    }

    #[test]
    fn test_single_classroom_routes_main_even_with_zero_students() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");
        let org = Organization::new("My School");
        store.put(&org).unwrap();
        store
            .put(&Membership::new(org.id, guide.id, Role::Guide))
            .unwrap();
        let classroom = Classroom::new(org.id, "Primary A");
        assert!(classroom.student_ids.is_empty());
        store.put(&classroom).unwrap();

        let router = SessionRouter::new(&store);
        assert!(matches!(
            router.determine_route(Some("device-1")),
            AppRoute::Main { classroom_id: Some(_) }
        ));
    }

    #[test]
    fn test_multiple_classrooms_route_main_without_selection() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");
        let org = Organization::new("My School");
        store.put(&org).unwrap();
        store
            .put(&Membership::new(org.id, guide.id, Role::SuperAdmin))
            .unwrap();
        store.put(&Classroom::new(org.id, "Primary A")).unwrap();
        store.put(&Classroom::new(org.id, "Primary B")).unwrap();

        let router = SessionRouter::new(&store);
        assert_eq!(
            router.determine_route(Some("device-1")),
            AppRoute::Main { classroom_id: None }
        );
    }

    #[test]
    fn test_first_membership_org_wins() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");

        let first_org = Organization::new("First");
        let second_org = Organization::new("Second");
        store.put(&first_org).unwrap();
        store.put(&second_org).unwrap();

        let mut early = Membership::new(first_org.id, guide.id, Role::Guide);
        early.created_at = chrono::Utc::now() - chrono::Duration::days(1);
        store.put(&early).unwrap();
        store
            .put(&Membership::new(second_org.id, guide.id, Role::Guide))
            .unwrap();

        // Only the second org has a classroom, but the first org is
        // active, so the router prompts for a classroom.
        store.put(&Classroom::new(second_org.id, "Primary A")).unwrap();

        let router = SessionRouter::new(&store);
        assert_eq!(
            router.determine_route(Some("device-1")),
            AppRoute::PromptCreateClassroom
        );
        assert_eq!(
            router.active_org_id(guide.id).unwrap(),
            Some(first_org.id)
        );
    }

    #[test]
    fn test_ensure_org_bootstrap() {
        let store = MemoryStore::new();
        let guide = signed_in_guide(&store, "device-1");
        let router = SessionRouter::new(&store);

        let org_id = router.ensure_org_bootstrap(guide.id, "My School").unwrap();

        let org: Option<Organization> = store.get(org_id).unwrap();
        assert_eq!(org.unwrap().name, "My School");

        let memberships: Vec<Membership> = store.list().unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, Role::SuperAdmin);

        // A second bootstrap returns the same org
        let again = router.ensure_org_bootstrap(guide.id, "Other").unwrap();
        assert_eq!(again, org_id);
        let orgs: Vec<Organization> = store.list().unwrap();
        assert_eq!(orgs.len(), 1);
    }
}
