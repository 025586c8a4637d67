use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role: String,
    pub position: String,
    /// Object-storage key; decorated into a URL at the response layer.
    pub avatar: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Users bucketed by whether they contribute to any active/testing task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActiveUserCount {
    pub total: i64,
    pub active: i64,
    pub not_active: i64,
}
