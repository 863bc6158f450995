//! Guide profile commands: show, update, list.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::{render, OutputOptions};
use crate::model::Guide;
use crate::services::{GuideService, GuideUpdate};
use crate::store::Datastore;

/// Output of the guide commands.
#[derive(Debug, Clone, Serialize)]
pub struct GuideOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub guides: Vec<Guide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GuideOutput {
    fn with_guides(guides: Vec<Guide>) -> Self {
        Self {
            success: true,
            guides,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            guides: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The guide command implementation.
pub struct GuideCommand<S: Datastore> {
    store: S,
}

impl<S: Datastore> GuideCommand<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Show a guide's profile.
    pub fn run_show(&self, guide_id: Uuid, _options: &OutputOptions) -> GuideOutput {
        match GuideService::new(&self.store).get(guide_id) {
            Ok(guide) => GuideOutput::with_guides(vec![guide]),
            Err(e) => GuideOutput::failure(e.to_string()),
        }
    }

    /// Apply a partial profile update.
    pub fn run_update(
        &self,
        guide_id: Uuid,
        update: GuideUpdate,
        _options: &OutputOptions,
    ) -> GuideOutput {
        match GuideService::new(&self.store).update(guide_id, update) {
            Ok(guide) => GuideOutput::with_guides(vec![guide]),
            Err(e) => GuideOutput::failure(e.to_string()),
        }
    }

    /// List all guides.
    pub fn run_list(&self, _options: &OutputOptions) -> GuideOutput {
        match GuideService::new(&self.store).list() {
            Ok(guides) => GuideOutput::with_guides(guides),
            Err(e) => GuideOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GuideOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Guide error: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
            if output.guides.is_empty() {
                return "No guides.\n".to_string();
            }
            let mut text = String::new();
            for guide in &output.guides {
                text.push_str(&format!(
                    "{}  {} ({}){}\n",
                    guide.id,
                    guide.full_name,
                    guide.role.as_str(),
                    guide
                        .email
                        .as_deref()
                        .map(|e| format!("  <{}>", e))
                        .unwrap_or_default()
                ));
            }
            text
        })
    }
}
