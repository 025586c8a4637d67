use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub contributor: Vec<Uuid>,
    pub status: String,
    /// A task may float without a project.
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One-row grouped count over the filtered task set.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct TaskStatusCount {
    pub total: i64,
    pub active: i64,
    pub testing: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Task lists bucketed by status, returned by the status-grouped endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskGroup {
    pub active: Vec<Task>,
    pub testing: Vec<Task>,
    pub completed: Vec<Task>,
    pub cancelled: Vec<Task>,
}

/// One rolling-week bucket of the overview chart. `count` sums the
/// active/testing/completed statuses; cancelled work is excluded.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOverviewWeek {
    pub start: String,
    pub end: String,
    pub count: i64,
}

/// Per-project task counts used to decorate project list/detail responses.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectTaskBucket {
    pub project_id: Uuid,
    pub total: i64,
    pub active: i64,
    pub testing: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl ProjectTaskBucket {
    pub fn into_count(self) -> TaskStatusCount {
        TaskStatusCount {
            total: self.total,
            active: self.active,
            testing: self.testing,
            completed: self.completed,
            cancelled: self.cancelled,
        }
    }
}
