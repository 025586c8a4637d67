use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub contributor: Vec<Uuid>,
    /// Object-storage keys; decorated into URLs at the response layer.
    pub attachments: Vec<String>,
    pub status: String,
    pub logo: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One-row grouped count over the filtered project set. An empty set yields
/// all zeros, which is also the fallback when the aggregate call fails.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct ProjectStatusCount {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub pending: i64,
    pub cancelled: i64,
}

/// Count of projects per distinct type value.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TypeCount {
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub total: i64,
}
