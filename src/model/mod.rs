//! Persisted record types for Pink Tower.
//!
//! Every record carries a generated `Uuid` and a UTC creation timestamp.
//! Day-granular fields (habit logs, summary logs) use `NaiveDate` so that
//! "one per calendar day" is a type-level property rather than a
//! normalization convention.

pub mod classroom;
pub mod guide;
pub mod habit;
pub mod invite;
pub mod observation;
pub mod org;
pub mod role;
pub mod student;
pub mod summary;
pub mod work;

pub use classroom::Classroom;
pub use guide::Guide;
pub use habit::{Habit, HabitCadence, HabitLog};
pub use invite::Invite;
pub use observation::StudentObservation;
pub use org::{Membership, Organization};
pub use role::Role;
pub use student::{ParentContact, Student};
pub use summary::{ParentSummaryLog, SummaryPeriod};
pub use work::{Lesson, TaskItem};
