//! Pink Tower - local-first classroom management for Montessori guides
//!
//! Pink Tower keeps a school's records (organizations, classrooms,
//! students, habits, lessons, observations) as plain JSON files on the
//! guide's own machine, and aggregates them into a per-guide My Day
//! board with quick actions.

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{FailOpen, PinkTowerError, Result};
pub use identity::DeviceIdentity;
pub use model::{
    Classroom, Guide, Habit, HabitCadence, HabitLog, Invite, Lesson, Membership, Organization,
    ParentContact, ParentSummaryLog, Role, Student, StudentObservation, SummaryPeriod, TaskItem,
};
pub use services::{
    Action, AppRoute, ClassroomService, DailyAggregator, GuideService, GuideUpdate, HabitService,
    InviteService, LessonService, MembershipService, MyDaySnapshot, ObservationQuery,
    ObservationService, OrgService, Period, SessionRouter, StudentService, StudentUpdate,
    SummaryService, TaskService,
};
pub use store::{Datastore, FileStore, MemoryStore, Record, RecordStore};

// CLI commands
pub use cli::{
    ClassroomCommand, GuideCommand, HabitCommand, InviteCommand, MyDayCommand, ObserveCommand,
    OrgCommand, SessionCommand, StudentCommand, SummaryCommand, WorkCommand,
};
