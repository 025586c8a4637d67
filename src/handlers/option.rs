//! Option endpoints backing client dropdowns, guarded by basic auth.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::filter::CommonQuery;
use crate::state::AppState;
use crate::types::{ProjectKind, ScheduleKind, POSITIONS};

/// Minimal id/name pair for selection lists.
#[derive(Debug, Serialize)]
pub struct IdName {
    pub id: Uuid,
    pub name: String,
}

/// GET /api/option/type/position
pub async fn positions() -> Json<Vec<&'static str>> {
    Json(POSITIONS.to_vec())
}

/// GET /api/option/type/project
pub async fn project_types() -> Json<Vec<&'static str>> {
    Json(ProjectKind::ALL.iter().map(|k| k.as_str()).collect())
}

/// GET /api/option/type/schedule
pub async fn schedule_types() -> Json<Vec<&'static str>> {
    Json(ScheduleKind::ALL.iter().map(|k| k.as_str()).collect())
}

/// GET /api/option/user
pub async fn users(State(state): State<AppState>) -> ApiResult<Json<Vec<IdName>>> {
    let users = state.users.find_all(&CommonQuery::unfiltered()).await.unwrap_or_else(|e| {
        tracing::warn!("Error listing users for options: {}", e);
        vec![]
    });
    Ok(Json(users.into_iter().map(|u| IdName { id: u.id, name: u.name }).collect()))
}

/// GET /api/option/project
pub async fn projects(State(state): State<AppState>) -> ApiResult<Json<Vec<IdName>>> {
    let projects = state.projects.find_all(&CommonQuery::unfiltered()).await.unwrap_or_else(|e| {
        tracing::warn!("Error listing projects for options: {}", e);
        vec![]
    });
    Ok(Json(projects.into_iter().map(|p| IdName { id: p.id, name: p.name }).collect()))
}
