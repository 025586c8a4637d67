//! Task endpoints: list, detail, grouped counts, rolling overview,
//! status-grouped lists, create, update, delete.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{millis_to_utc, MessageResponse};
use crate::database::models::{Task, TaskGroup, TaskOverviewWeek, TaskStatusCount};
use crate::error::{ApiError, ApiResult};
use crate::filter::query::{end_of_week, start_of_week};
use crate::filter::{CommonQuery, ListParams};
use crate::state::AppState;
use crate::types::TaskStatus;

/// Week offsets of the rolling overview, oldest first.
const OVERVIEW_WEEKS: [i64; 8] = [-7, -6, -5, -4, -3, -2, -1, 0];

const OVERVIEW_LABEL: &str = "%d %b";

/// GET /api/task/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .find_one_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(task))
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(state.tasks.find_all(&cq).await?))
}

/// GET /api/task/count
pub async fn count(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<TaskStatusCount>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(status_count(&state, &cq).await))
}

/// GET /api/task/overview
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TaskOverviewWeek>>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(overview_weeks(&state, cq).await))
}

/// GET /api/task/status
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<TaskGroup>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(status_group(&state, cq).await))
}

/// Grouped status counts; failures degrade to the zero-value structure.
pub(crate) async fn status_count(state: &AppState, cq: &CommonQuery) -> TaskStatusCount {
    match state.tasks.count_by_status(cq).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Error counting tasks: {}", e);
            TaskStatusCount::default()
        }
    }
}

/// Eight Monday-start week buckets ending with the current week. The bucket
/// count sums active/testing/completed; weeks without matches stay at zero
/// so the chart always has eight points.
pub(crate) async fn overview_weeks(state: &AppState, mut cq: CommonQuery) -> Vec<TaskOverviewWeek> {
    let mut weeks = Vec::with_capacity(OVERVIEW_WEEKS.len());
    for offset in OVERVIEW_WEEKS {
        cq.start = start_of_week(offset);
        cq.end = end_of_week(offset);

        let count = status_count(state, &cq).await;
        weeks.push(TaskOverviewWeek {
            start: cq.start.format(OVERVIEW_LABEL).to_string(),
            end: cq.end.format(OVERVIEW_LABEL).to_string(),
            count: count.active + count.testing + count.completed,
        });
    }
    weeks
}

/// Task lists bucketed by status. A failing bucket is logged and left empty
/// rather than failing the whole response.
pub(crate) async fn status_group(state: &AppState, mut cq: CommonQuery) -> TaskGroup {
    let mut group = TaskGroup::default();
    for status in TaskStatus::ALL {
        cq.status = status.as_str().to_string();
        match state.tasks.find_all(&cq).await {
            Ok(tasks) => match status {
                TaskStatus::Active => group.active = tasks,
                TaskStatus::Testing => group.testing = tasks,
                TaskStatus::Completed => group.completed = tasks,
                TaskStatus::Cancelled => group.cancelled = tasks,
            },
            Err(e) => tracing::warn!("Error finding {} tasks: {}", status.as_str(), e),
        }
    }
    group
}

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: i64,
    #[serde(default)]
    pub end_date: i64,
    #[serde(default)]
    pub contributor: Vec<Uuid>,
    pub project_id: Option<Uuid>,
}

impl TaskForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.name = self.name.trim().to_string();

        let mut errors = HashMap::new();
        if self.name.is_empty() || self.name.len() > 100 {
            errors.insert("name".to_string(), "Name must be between 1 and 100 characters".to_string());
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
            return Err(ApiError::validation_error("Invalid task form", Some(errors)));
        }
        Ok(self)
    }
}

/// POST /api/task
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<TaskForm>,
) -> ApiResult<Json<Task>> {
    let form = form.validate()?;

    // A task may be created without a project, but a named project must exist.
    if let Some(project_id) = form.project_id {
        state
            .projects
            .find_one_by_id(project_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Project not found"))?;
    }

    let start_date =
        millis_to_utc(form.start_date).ok_or_else(|| ApiError::bad_request("Invalid start date"))?;
    let end_date =
        millis_to_utc(form.end_date).ok_or_else(|| ApiError::bad_request("Invalid end date"))?;

    let task = Task {
        id: Uuid::new_v4(),
        name: form.name,
        description: form.description,
        start_date,
        end_date,
        contributor: form.contributor,
        status: TaskStatus::Active.as_str().to_string(),
        project_id: form.project_id,
        created_at: Utc::now(),
        deleted_at: None,
    };

    let created = state.tasks.insert(&task).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub contributor: Option<Vec<Uuid>>,
    pub status: Option<String>,
}

/// PUT /api/task/:id
///
/// Partial update: absent fields keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<UpdateTaskForm>,
) -> ApiResult<Json<Task>> {
    let mut task = state
        .tasks
        .find_one_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    if let Some(name) = form.name {
        let name = name.trim().to_string();
        if name.is_empty() || name.len() > 100 {
            return Err(ApiError::bad_request("Name must be between 1 and 100 characters"));
        }
        task.name = name;
    }
    if let Some(description) = form.description {
        task.description = description;
    }
    if let Some(millis) = form.start_date {
        task.start_date =
            millis_to_utc(millis).ok_or_else(|| ApiError::bad_request("Invalid start date"))?;
    }
    if let Some(millis) = form.end_date {
        task.end_date =
            millis_to_utc(millis).ok_or_else(|| ApiError::bad_request("Invalid end date"))?;
    }
    if let Some(contributor) = form.contributor {
        if contributor.is_empty() {
            return Err(ApiError::bad_request("At least one contributor is required"));
        }
        task.contributor = contributor;
    }
    if let Some(status) = form.status {
        let status = status.trim().to_lowercase();
        if TaskStatus::parse(&status).is_none() {
            return Err(ApiError::bad_request("Invalid task status"));
        }
        task.status = status;
    }

    let updated = state
        .tasks
        .update(&task)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(updated))
}

/// DELETE /api/task/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state.tasks.soft_delete(id).await?;
    if !deleted {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(Json(MessageResponse::new("Task deleted")))
}
