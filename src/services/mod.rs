//! Domain services over the record store.
//!
//! Each service wraps a [`Datastore`](crate::store::Datastore) handle
//! and implements the operations for one entity family. The session
//! router and the My Day aggregator sit on top of them.

pub mod classrooms;
pub mod guides;
pub mod habits;
pub mod invites;
pub mod memberships;
pub mod myday;
pub mod observations;
pub mod orgs;
pub mod permissions;
pub mod session;
pub mod students;
pub mod summaries;
pub mod work;

pub use classrooms::ClassroomService;
pub use guides::{GuideService, GuideUpdate};
pub use habits::HabitService;
pub use invites::InviteService;
pub use memberships::MembershipService;
pub use myday::{DailyAggregator, MyDaySnapshot, Period, StudentStatus};
pub use observations::{ObservationQuery, ObservationService};
pub use orgs::OrgService;
pub use permissions::Action;
pub use session::{AppRoute, SessionRouter};
pub use students::{StudentService, StudentUpdate};
pub use summaries::SummaryService;
pub use work::{LessonService, TaskService};
