use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Short-lived verification code mailed to a user. Unlike the other
/// resources these are transient: consumed by marking `used`, expired by
/// `expires_at`, never soft-deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub code: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
