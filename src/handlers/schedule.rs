//! Schedule endpoints: filtered list with contributor names resolved, create.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::millis_to_utc;
use crate::database::models::Schedule;
use crate::error::{ApiError, ApiResult};
use crate::filter::{CommonQuery, ListParams};
use crate::state::AppState;
use crate::types::ScheduleKind;

/// Schedule plus the display names of its contributors. Unknown (deleted)
/// contributors are skipped rather than failing the listing.
#[derive(Debug, Serialize)]
pub struct SchedulePayload {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub contributor_names: Vec<String>,
}

/// Shared by GET /api/schedules and GET /api/me/schedules.
pub(crate) async fn schedule_list(
    state: &AppState,
    cq: &CommonQuery,
) -> ApiResult<Vec<SchedulePayload>> {
    let schedules = state.schedules.find_all(cq).await?;

    let mut ids: Vec<Uuid> = schedules.iter().flat_map(|s| s.contributor.iter().copied()).collect();
    ids.sort_unstable();
    ids.dedup();

    let names: HashMap<Uuid, String> =
        state.users.find_names_by_ids(&ids).await?.into_iter().collect();

    Ok(schedules
        .into_iter()
        .map(|schedule| {
            let contributor_names = schedule
                .contributor
                .iter()
                .filter_map(|id| names.get(id).cloned())
                .collect();
            SchedulePayload { schedule, contributor_names }
        })
        .collect())
}

/// GET /api/schedules
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SchedulePayload>>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(schedule_list(&state, &cq).await?))
}

#[derive(Debug, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: i64,
    #[serde(default)]
    pub end_date: i64,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub contributor: Vec<Uuid>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ScheduleForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.name = self.name.trim().to_string();
        self.kind = self.kind.trim().to_lowercase();

        let mut errors = HashMap::new();
        if self.name.is_empty() || self.name.len() > 100 {
            errors.insert("name".to_string(), "Name must be between 1 and 100 characters".to_string());
        }
        if ScheduleKind::parse(&self.kind).is_none() {
            errors.insert("type".to_string(), "Invalid schedule type".to_string());
        }
        if millis_to_utc(self.start_date).is_none() {
            errors.insert("start_date".to_string(), "Invalid start date".to_string());
        }
        if millis_to_utc(self.end_date).is_none() {
            errors.insert("end_date".to_string(), "Invalid end date".to_string());
        }
        if self.contributor.is_empty() {
            errors.insert("contributor".to_string(), "At least one contributor is required".to_string());
        }
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Invalid schedule form", Some(errors)));
        }
        Ok(self)
    }
}

/// POST /api/schedule
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<ScheduleForm>,
) -> ApiResult<(StatusCode, Json<Schedule>)> {
    let form = form.validate()?;

    let start_date =
        millis_to_utc(form.start_date).ok_or_else(|| ApiError::bad_request("Invalid start date"))?;
    let end_date =
        millis_to_utc(form.end_date).ok_or_else(|| ApiError::bad_request("Invalid end date"))?;

    let schedule = Schedule {
        id: Uuid::new_v4(),
        name: form.name,
        description: form.description,
        start_date,
        end_date,
        start_time: form.start_time,
        end_time: form.end_time,
        contributor: form.contributor,
        kind: form.kind,
        created_at: Utc::now(),
        deleted_at: None,
    };

    let created = state.schedules.insert(&schedule).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
