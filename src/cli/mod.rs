//! CLI commands for Pink Tower.
//!
//! Commands are organized by noun:
//! - **Session**: sign-in, sign-out, route inspection
//! - **Directory**: org, guide, classroom, student, invite
//! - **Daily work**: habit, task, lesson, observe, summary, myday
//!
//! Every command follows the same shape: an `Options` struct carrying
//! `--json`/`--quiet`, a serializable `Output`, a store-generic command
//! struct with `run_*` methods, and a `format_output` renderer.

pub mod classroom;
pub mod guide;
pub mod habit;
pub mod invite;
pub mod myday;
pub mod observe;
pub mod org;
pub mod session;
pub mod student;
pub mod summary;
pub mod work;

pub use classroom::ClassroomCommand;
pub use guide::GuideCommand;
pub use habit::HabitCommand;
pub use invite::InviteCommand;
pub use myday::MyDayCommand;
pub use observe::ObserveCommand;
pub use org::OrgCommand;
pub use session::SessionCommand;
pub use student::StudentCommand;
pub use summary::SummaryCommand;
pub use work::WorkCommand;

/// Shared output options for all commands.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Render a serializable output per the shared options.
pub(crate) fn render<T: serde::Serialize>(
    output: &T,
    options: &OutputOptions,
    human: impl FnOnce() -> String,
) -> String {
    if options.quiet {
        return String::new();
    }
    if options.json {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    } else {
        human()
    }
}
