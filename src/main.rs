//! Pink Tower - local-first classroom management for Montessori guides
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::process::ExitCode;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use pinktower::cli::work::WorkKind;
use pinktower::cli::OutputOptions;
use pinktower::config::{pinktower_home, Config};
use pinktower::model::{Guide, HabitCadence, Role, SummaryPeriod};
use pinktower::services::{ObservationQuery, Period, SessionRouter, StudentUpdate};
use pinktower::store::FileStore;
use pinktower::DeviceIdentity;

// =============================================================================
// CLI Definition
// =============================================================================

/// Pink Tower - local-first classroom management for Montessori guides
#[derive(Parser)]
#[command(name = "pinktower")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, or inspect the session route
    Session {
        #[command(subcommand)]
        action: SessionAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Manage organizations and their members
    Org {
        #[command(subcommand)]
        action: OrgAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Show and update guide profiles
    Guide {
        #[command(subcommand)]
        action: GuideAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Issue, list, revoke, and redeem invites
    Invite {
        #[command(subcommand)]
        action: InviteAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Manage classrooms and their rosters
    Classroom {
        #[command(subcommand)]
        action: ClassroomAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Enroll and manage students
    Student {
        #[command(subcommand)]
        action: StudentAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Track student habits
    Habit {
        #[command(subcommand)]
        action: HabitAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Manage student tasks
    Task {
        #[command(subcommand)]
        action: WorkAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Manage student lessons
    Lesson {
        #[command(subcommand)]
        action: WorkAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Record and search observations
    Observe {
        #[command(subcommand)]
        action: ObserveAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Compose and track parent summaries
    Summary {
        #[command(subcommand)]
        action: SummaryAction,
        /// Summary period
        #[arg(long, short, global = true, value_enum, default_value_t = SummaryPeriodArg::Day)]
        period: SummaryPeriodArg,
        /// Date within the period (defaults to today)
        #[arg(long, global = true)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Show the My Day board and apply quick actions
    Myday {
        #[command(subcommand)]
        action: MyDayAction,
        /// Aggregation period
        #[arg(long, short, global = true, value_enum, default_value_t = PeriodArg::Day)]
        period: PeriodArg,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Sign in with a device user key
    SignIn {
        /// The opaque user key identifying this guide
        user_key: String,
    },
    /// Sign out of this device
    SignOut,
    /// Show the current route
    Status,
}

#[derive(Subcommand)]
enum OrgAction {
    /// Create an organization; you become its super-admin
    Create {
        /// Organization name
        name: String,
    },
    /// Rename an organization
    Rename {
        org_id: Uuid,
        /// New name
        name: String,
    },
    /// List all organizations
    List,
    /// List an organization's members
    Members { org_id: Uuid },
    /// Change a member's role
    SetRole {
        org_id: Uuid,
        guide_id: Uuid,
        #[arg(value_enum)]
        role: RoleArg,
    },
    /// Remove a member
    RemoveMember { org_id: Uuid, guide_id: Uuid },
}

#[derive(Subcommand)]
enum GuideAction {
    /// Show the signed-in guide's profile
    Whoami,
    /// Update the signed-in guide's profile
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Classroom opened by default
        #[arg(long)]
        default_classroom: Option<Uuid>,
        /// Clear the default classroom
        #[arg(long, conflicts_with = "default_classroom")]
        clear_default_classroom: bool,
    },
    /// List all guides
    List,
}

#[derive(Subcommand)]
enum InviteAction {
    /// Issue an invite code
    Create {
        org_id: Uuid,
        /// Role granted on redemption
        #[arg(long, value_enum, default_value_t = RoleArg::Guide)]
        role: RoleArg,
        /// Expiry date (open-ended when omitted)
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// List open invites
    List { org_id: Uuid },
    /// Revoke an invite
    Revoke { org_id: Uuid, invite_id: Uuid },
    /// Redeem an invite code and join its organization
    Redeem {
        /// The invite code
        code: String,
    },
}

#[derive(Subcommand)]
enum ClassroomAction {
    /// Create a classroom; you are assigned to it
    Create {
        org_id: Uuid,
        /// Classroom name
        name: String,
    },
    /// List an organization's classrooms
    List { org_id: Uuid },
    /// Enroll a student in a classroom
    Enroll { classroom_id: Uuid, student_id: Uuid },
    /// Remove a student from a classroom
    Unenroll { classroom_id: Uuid, student_id: Uuid },
    /// Assign a guide to a classroom
    AssignGuide { classroom_id: Uuid, guide_id: Uuid },
}

#[derive(Subcommand)]
enum StudentAction {
    /// Enroll a new student
    Enroll {
        first_name: String,
        last_name: String,
        /// Classroom to enroll into
        #[arg(long)]
        classroom: Option<Uuid>,
    },
    /// Update a student's details
    Update {
        student_id: Uuid,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// List all students
    List,
    /// Attach a parent contact
    AddContact {
        student_id: Uuid,
        full_name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List a student's parent contacts
    Contacts { student_id: Uuid },
}

#[derive(Subcommand)]
enum HabitAction {
    /// Add a habit to a student
    Add {
        student_id: Uuid,
        /// Habit name
        name: String,
        #[arg(long, value_enum, default_value_t = CadenceArg::Daily)]
        cadence: CadenceArg,
    },
    /// List a student's habits
    List { student_id: Uuid },
    /// Toggle a habit's completion for a date
    Toggle {
        habit_id: Uuid,
        /// Date to toggle (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the most-used habit names
    Popular {
        #[arg(long, short, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum WorkAction {
    /// Add an item for a student
    Add {
        student_id: Uuid,
        /// Item title
        title: String,
        #[arg(long)]
        details: Option<String>,
        /// Scheduled date
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List a student's items, newest first
    List { student_id: Uuid },
    /// Mark an item completed
    Complete { id: Uuid },
    /// Reopen a completed item
    Reopen { id: Uuid },
    /// Delete an item
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum ObserveAction {
    /// Record an observation about a student
    Add {
        student_id: Uuid,
        /// The observation text
        content: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        material: Option<String>,
        /// Additional students present
        #[arg(long = "tag")]
        tagged: Vec<Uuid>,
    },
    /// Search observations, newest first
    Search {
        #[arg(long)]
        student: Option<Uuid>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        material: Option<String>,
        /// Case-insensitive substring match on content
        #[arg(long)]
        contains: Option<String>,
        /// Written on or after this date
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Written before this date
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Delete an observation
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum SummaryAction {
    /// Compose the shareable summary text for a student
    Compose {
        student_id: Uuid,
        /// The summary body
        body: String,
    },
    /// Record that a summary was sent
    MarkSent { student_id: Uuid },
    /// Check whether a summary was sent
    Status { student_id: Uuid },
}

#[derive(Subcommand)]
enum MyDayAction {
    /// Show the board
    Show,
    /// Complete a task from the board
    CompleteTask { task_id: Uuid },
    /// Complete a lesson from the board
    CompleteLesson { lesson_id: Uuid },
    /// Mark a student's parent summary sent for this period
    SummarySent { student_id: Uuid },
    /// Mark all of a student's daily habits done for today
    HabitsDone { student_id: Uuid },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    SuperAdmin,
    Admin,
    Guide,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::SuperAdmin => Role::SuperAdmin,
            RoleArg::Admin => Role::Admin,
            RoleArg::Guide => Role::Guide,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CadenceArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<CadenceArg> for HabitCadence {
    fn from(cadence: CadenceArg) -> Self {
        match cadence {
            CadenceArg::Daily => HabitCadence::Daily,
            CadenceArg::Weekly => HabitCadence::Weekly,
            CadenceArg::Monthly => HabitCadence::Monthly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryPeriodArg {
    Day,
    Week,
    Month,
}

impl From<SummaryPeriodArg> for SummaryPeriod {
    fn from(period: SummaryPeriodArg) -> Self {
        match period {
            SummaryPeriodArg::Day => SummaryPeriod::Day,
            SummaryPeriodArg::Week => SummaryPeriod::Week,
            SummaryPeriodArg::Month => SummaryPeriod::Month,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    Day,
    Week,
}

impl From<PeriodArg> for Period {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pinktower error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.pinktower/crash.log and exits non-zero so
/// scripted callers notice.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("pinktower panic: {}", info);

        if let Some(home) = pinktower_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(2);
    }));
}

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

/// Run the CLI and return the exit code.
fn run() -> CliResult {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Session {
            action,
            json,
            quiet,
        } => run_session(action, &config, options(json, quiet)),
        Commands::Org {
            action,
            json,
            quiet,
        } => run_org(action, &config, options(json, quiet)),
        Commands::Guide {
            action,
            json,
            quiet,
        } => run_guide(action, &config, options(json, quiet)),
        Commands::Invite {
            action,
            json,
            quiet,
        } => run_invite(action, &config, options(json, quiet)),
        Commands::Classroom {
            action,
            json,
            quiet,
        } => run_classroom(action, &config, options(json, quiet)),
        Commands::Student {
            action,
            json,
            quiet,
        } => run_student(action, &config, options(json, quiet)),
        Commands::Habit {
            action,
            json,
            quiet,
        } => run_habit(action, &config, options(json, quiet)),
        Commands::Task {
            action,
            json,
            quiet,
        } => run_work(WorkKind::Task, action, &config, options(json, quiet)),
        Commands::Lesson {
            action,
            json,
            quiet,
        } => run_work(WorkKind::Lesson, action, &config, options(json, quiet)),
        Commands::Observe {
            action,
            json,
            quiet,
        } => run_observe(action, &config, options(json, quiet)),
        Commands::Summary {
            action,
            period,
            date,
            json,
            quiet,
        } => run_summary(action, period.into(), date, &config, options(json, quiet)),
        Commands::Myday {
            action,
            period,
            json,
            quiet,
        } => run_myday(action, period.into(), &config, options(json, quiet)),
    }
}

fn options(json: bool, quiet: bool) -> OutputOptions {
    OutputOptions { json, quiet }
}

/// Open the file store at the configured data directory.
fn open_store(config: &Config) -> Result<FileStore, Box<dyn std::error::Error>> {
    let root = config
        .resolved_data_dir()
        .ok_or("could not determine data directory")?;
    Ok(FileStore::with_root(root)?)
}

/// Resolve the signed-in guide from the device identity.
fn signed_in_guide(store: &FileStore) -> Result<Guide, Box<dyn std::error::Error>> {
    let identity = DeviceIdentity::new()?;
    let key = identity
        .current()
        .ok_or("not signed in (run `pinktower session sign-in <user-key>`)")?;
    Ok(SessionRouter::new(store).get_or_create_guide(&key)?)
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_nonempty(formatted: String) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn run_session(action: SessionAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::SessionCommand;

    let store = open_store(config)?;
    let identity = DeviceIdentity::new()?;
    let cmd = SessionCommand::new(store, identity);

    let output = match action {
        SessionAction::SignIn { user_key } => cmd.run_sign_in(&user_key, &options),
        SessionAction::SignOut => cmd.run_sign_out(&options),
        SessionAction::Status => cmd.run_status(&options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_org(action: OrgAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::OrgCommand;

    let store = open_store(config)?;
    let cmd = OrgCommand::new(store.clone());

    let output = match action {
        OrgAction::Create { name } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_create(&name, guide.id, &options)
        }
        OrgAction::Rename { org_id, name } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_rename(org_id, &name, guide.id, &options)
        }
        OrgAction::List => cmd.run_list(&options),
        OrgAction::Members { org_id } => cmd.run_members(org_id, &options),
        OrgAction::SetRole {
            org_id,
            guide_id,
            role,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_set_role(org_id, guide_id, role.into(), guide.id, &options)
        }
        OrgAction::RemoveMember { org_id, guide_id } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_remove_member(org_id, guide_id, guide.id, &options)
        }
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_guide(action: GuideAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::GuideCommand;
    use pinktower::services::GuideUpdate;

    let store = open_store(config)?;
    let cmd = GuideCommand::new(store.clone());

    let output = match action {
        GuideAction::Whoami => {
            let guide = signed_in_guide(&store)?;
            cmd.run_show(guide.id, &options)
        }
        GuideAction::Update {
            name,
            email,
            default_classroom,
            clear_default_classroom,
        } => {
            let guide = signed_in_guide(&store)?;
            let default_classroom_id = if clear_default_classroom {
                Some(None)
            } else {
                default_classroom.map(Some)
            };
            cmd.run_update(
                guide.id,
                GuideUpdate {
                    full_name: name,
                    email,
                    role: None,
                    default_classroom_id,
                },
                &options,
            )
        }
        GuideAction::List => cmd.run_list(&options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_invite(action: InviteAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::InviteCommand;

    let store = open_store(config)?;
    let cmd = InviteCommand::new(store.clone());

    let output = match action {
        InviteAction::Create {
            org_id,
            role,
            expires,
        } => {
            let guide = signed_in_guide(&store)?;
            let expires_at = expires.map(|d| d.and_time(NaiveTime::MIN).and_utc());
            cmd.run_create(org_id, role.into(), guide.id, expires_at, &options)
        }
        InviteAction::List { org_id } => cmd.run_list(org_id, &options),
        InviteAction::Revoke { org_id, invite_id } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_revoke(org_id, invite_id, guide.id, &options)
        }
        InviteAction::Redeem { code } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_redeem(&code, guide.id, &options)
        }
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_classroom(action: ClassroomAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::ClassroomCommand;

    let store = open_store(config)?;
    let cmd = ClassroomCommand::new(store.clone());

    let output = match action {
        ClassroomAction::Create { org_id, name } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_create(org_id, &name, guide.id, &options)
        }
        ClassroomAction::List { org_id } => cmd.run_list(org_id, &options),
        ClassroomAction::Enroll {
            classroom_id,
            student_id,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_enroll(classroom_id, student_id, guide.id, &options)
        }
        ClassroomAction::Unenroll {
            classroom_id,
            student_id,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_unenroll(classroom_id, student_id, guide.id, &options)
        }
        ClassroomAction::AssignGuide {
            classroom_id,
            guide_id,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_assign_guide(classroom_id, guide_id, guide.id, &options)
        }
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_student(action: StudentAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::StudentCommand;

    let store = open_store(config)?;
    let cmd = StudentCommand::new(store.clone(), config.defaults.seed_habits.clone());

    let output = match action {
        StudentAction::Enroll {
            first_name,
            last_name,
            classroom,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_enroll(&first_name, &last_name, classroom, guide.id, &options)
        }
        StudentAction::Update {
            student_id,
            first_name,
            last_name,
            notes,
            image_url,
        } => cmd.run_update(
            student_id,
            StudentUpdate {
                first_name,
                last_name,
                notes,
                image_url,
            },
            &options,
        ),
        StudentAction::List => cmd.run_list(&options),
        StudentAction::AddContact {
            student_id,
            full_name,
            email,
            phone,
        } => cmd.run_add_contact(student_id, &full_name, email, phone, &options),
        StudentAction::Contacts { student_id } => cmd.run_contacts(student_id, &options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_habit(action: HabitAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::HabitCommand;

    let store = open_store(config)?;
    let cmd = HabitCommand::new(store.clone());

    let output = match action {
        HabitAction::Add {
            student_id,
            name,
            cadence,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_add(student_id, &name, cadence.into(), guide.id, &options)
        }
        HabitAction::List { student_id } => cmd.run_list(student_id, &options),
        HabitAction::Toggle { habit_id, date } => {
            let guide = signed_in_guide(&store)?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            cmd.run_toggle(habit_id, date, guide.id, &options)
        }
        HabitAction::Popular { limit } => cmd.run_popular(limit, &options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_work(
    kind: WorkKind,
    action: WorkAction,
    config: &Config,
    options: OutputOptions,
) -> CliResult {
    use pinktower::cli::WorkCommand;

    let store = open_store(config)?;
    let cmd = WorkCommand::new(store.clone());

    let output = match action {
        WorkAction::Add {
            student_id,
            title,
            details,
            due,
        } => {
            let guide = signed_in_guide(&store)?;
            let scheduled_for = due.map(|d| d.and_time(NaiveTime::MIN).and_utc());
            cmd.run_add(
                kind,
                student_id,
                &title,
                details,
                scheduled_for,
                guide.id,
                &options,
            )
        }
        WorkAction::List { student_id } => cmd.run_list(kind, student_id, &options),
        WorkAction::Complete { id } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_set_completed(kind, id, true, guide.id, &options)
        }
        WorkAction::Reopen { id } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_set_completed(kind, id, false, guide.id, &options)
        }
        WorkAction::Delete { id } => cmd.run_delete(kind, id, &options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_observe(action: ObserveAction, config: &Config, options: OutputOptions) -> CliResult {
    use pinktower::cli::ObserveCommand;

    let store = open_store(config)?;
    let cmd = ObserveCommand::new(store.clone());

    let output = match action {
        ObserveAction::Add {
            student_id,
            content,
            subject,
            material,
            tagged,
        } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_add(
                student_id, &content, subject, material, tagged, guide.id, &options,
            )
        }
        ObserveAction::Search {
            student,
            subject,
            material,
            contains,
            since,
            until,
        } => {
            let query = ObservationQuery {
                student_id: student,
                subject_tag: subject,
                material_tag: material,
                content_contains: contains,
                since: since.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
                until: until.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            };
            cmd.run_search(&query, &options)
        }
        ObserveAction::Delete { id } => cmd.run_delete(id, &options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_summary(
    action: SummaryAction,
    period: SummaryPeriod,
    date: Option<NaiveDate>,
    config: &Config,
    options: OutputOptions,
) -> CliResult {
    use pinktower::cli::SummaryCommand;

    let store = open_store(config)?;
    let cmd = SummaryCommand::new(store.clone(), config.summary.footer.clone());
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let output = match action {
        SummaryAction::Compose { student_id, body } => {
            cmd.run_compose(student_id, date, period, &body, &options)
        }
        SummaryAction::MarkSent { student_id } => {
            let guide = signed_in_guide(&store)?;
            cmd.run_mark_sent(student_id, date, period, guide.id, &options)
        }
        SummaryAction::Status { student_id } => cmd.run_status(student_id, date, period, &options),
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_myday(
    action: MyDayAction,
    period: Period,
    config: &Config,
    options: OutputOptions,
) -> CliResult {
    use pinktower::cli::MyDayCommand;

    let store = open_store(config)?;
    let guide = signed_in_guide(&store)?;
    let cmd = MyDayCommand::new(store, config.summary.footer.clone());
    let today = Utc::now().date_naive();

    let output = match action {
        MyDayAction::Show => cmd.run_show(guide.id, period, today, &options),
        MyDayAction::CompleteTask { task_id } => {
            cmd.run_complete_task(guide.id, task_id, period, today, &options)
        }
        MyDayAction::CompleteLesson { lesson_id } => {
            cmd.run_complete_lesson(guide.id, lesson_id, period, today, &options)
        }
        MyDayAction::SummarySent { student_id } => {
            cmd.run_summary_sent(guide.id, student_id, period, today, &options)
        }
        MyDayAction::HabitsDone { student_id } => {
            cmd.run_habits_done(guide.id, student_id, period, today, &options)
        }
    };

    print_nonempty(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
