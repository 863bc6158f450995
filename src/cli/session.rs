//! Session commands: sign-in, sign-out, and route inspection.

use serde::Serialize;

use crate::cli::{render, OutputOptions};
use crate::identity::DeviceIdentity;
use crate::services::{AppRoute, SessionRouter};
use crate::store::Datastore;

/// Output of the session commands.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutput {
    pub success: bool,
    /// The route after the operation.
    pub route: AppRoute,
    /// The signed-in guide's name, when signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionOutput {
    fn at_route(route: AppRoute, guide_name: Option<String>) -> Self {
        Self {
            success: true,
            route,
            guide_name,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            route: AppRoute::SignIn,
            guide_name: None,
            error: Some(error.into()),
        }
    }
}

/// The session command implementation.
pub struct SessionCommand<S: Datastore> {
    store: S,
    identity: DeviceIdentity,
}

impl<S: Datastore> SessionCommand<S> {
    pub fn new(store: S, identity: DeviceIdentity) -> Self {
        Self { store, identity }
    }

    /// Sign in with a device identity key and report the new route.
    pub fn run_sign_in(&self, user_key: &str, _options: &OutputOptions) -> SessionOutput {
        if let Err(e) = self.identity.set(user_key) {
            return SessionOutput::failure(e.to_string());
        }
        self.run_status(_options)
    }

    /// Sign out and report the new route (always the sign-in screen).
    pub fn run_sign_out(&self, _options: &OutputOptions) -> SessionOutput {
        if let Err(e) = self.identity.clear() {
            return SessionOutput::failure(e.to_string());
        }
        SessionOutput::at_route(AppRoute::SignIn, None)
    }

    /// Compute the current route without mutating anything beyond the
    /// router's guide bootstrap.
    pub fn run_status(&self, _options: &OutputOptions) -> SessionOutput {
        let router = SessionRouter::new(&self.store);
        let key = self.identity.current();
        let route = router.determine_route(key.as_deref());

        let guide_name = key
            .as_deref()
            .and_then(|k| router.get_or_create_guide(k).ok())
            .map(|g| g.full_name);

        SessionOutput::at_route(route, guide_name)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SessionOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Session error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            let route = match &output.route {
                AppRoute::SignIn => "sign-in".to_string(),
                AppRoute::PromptCreateOrganization => "create an organization".to_string(),
                AppRoute::PromptJoinOrganization => "join an organization".to_string(),
                AppRoute::PromptCreateClassroom => "create a classroom".to_string(),
                AppRoute::Main { classroom_id } => match classroom_id {
                    Some(id) => format!("main (classroom {})", id),
                    None => "main (choose a classroom)".to_string(),
                },
            };
            match &output.guide_name {
                Some(name) => format!("Signed in as {}. Next: {}\n", name, route),
                None => format!("Not signed in. Next: {}\n", route),
            }
        })
    }
}
