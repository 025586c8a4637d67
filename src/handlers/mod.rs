pub mod auth;
pub mod code;
pub mod me;
pub mod option;
pub mod project;
pub mod schedule;
pub mod task;
pub mod user;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Generic `{"message": "..."}` payload for endpoints without a resource body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Form timestamps arrive as epoch milliseconds.
pub(crate) fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
