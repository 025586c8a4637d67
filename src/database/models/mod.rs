pub mod code;
pub mod project;
pub mod schedule;
pub mod task;
pub mod user;

pub use code::VerificationCode;
pub use project::{Project, ProjectStatusCount, TypeCount};
pub use schedule::Schedule;
pub use task::{ProjectTaskBucket, Task, TaskGroup, TaskOverviewWeek, TaskStatusCount};
pub use user::{ActiveUserCount, User};
