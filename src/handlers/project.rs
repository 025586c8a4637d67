//! Project endpoints: paginated list with task-count decoration, detail,
//! grouped counts, create, delete.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{millis_to_utc, MessageResponse};
use crate::database::models::{Project, ProjectStatusCount, TaskStatusCount, TypeCount};
use crate::error::{ApiError, ApiResult};
use crate::filter::{CommonQuery, ListParams, PageEnvelope, DEFAULT_PAGE_SIZE};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::{ProjectKind, ProjectStatus};

/// Project plus its response-only decorations: asset URLs and the task
/// status buckets computed per request.
#[derive(Debug, Serialize)]
pub struct ProjectPayload {
    #[serde(flatten)]
    pub project: Project,
    pub logo_url: Option<String>,
    pub attachment_urls: Vec<String>,
    pub tasks: TaskStatusCount,
}

/// Attach task buckets and asset URLs to a set of projects. Bucket lookup
/// failures degrade to zero counts; the list itself still renders.
async fn decorate(state: &AppState, projects: Vec<Project>) -> Vec<ProjectPayload> {
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let buckets = match state.tasks.buckets_by_project(&ids).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Error counting tasks per project: {}", e);
            vec![]
        }
    };

    let mut by_project: HashMap<Uuid, TaskStatusCount> = buckets
        .into_iter()
        .map(|b| (b.project_id, b.into_count()))
        .collect();

    let assets = &state.config.assets;
    projects
        .into_iter()
        .map(|project| {
            let tasks = by_project.remove(&project.id).unwrap_or_default();
            let logo_url = assets.url_for(&assets.logo_dir, &project.logo);
            let attachment_urls = project
                .attachments
                .iter()
                .filter_map(|key| assets.url_for(&assets.file_dir, key))
                .collect();
            ProjectPayload { project, logo_url, attachment_urls, tasks }
        })
        .collect()
}

/// Shared by GET /api/projects and GET /api/me/projects.
pub(crate) async fn project_page(
    state: &AppState,
    mut cq: CommonQuery,
) -> ApiResult<PageEnvelope<ProjectPayload>> {
    let limit = *cq.limit.get_or_insert(DEFAULT_PAGE_SIZE);
    let page = cq.page;

    let projects = state.projects.find_all(&cq).await?;
    let payloads = decorate(state, projects).await;

    let mut count_cq = cq.clone();
    count_cq.reset_pagination();
    let total = state.projects.count(&count_cq).await?;

    Ok(PageEnvelope::new(payloads, total, page, limit))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageEnvelope<ProjectPayload>>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(project_page(&state, cq).await?))
}

/// GET /api/project/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectPayload>> {
    let project = state
        .projects
        .find_one_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let mut payloads = decorate(&state, vec![project]).await;
    Ok(Json(payloads.remove(0)))
}

/// GET /api/project/count
pub async fn count(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ProjectStatusCount>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(status_count(&state, &cq).await))
}

/// GET /api/project/count/type
pub async fn count_by_type(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TypeCount>>> {
    let cq = CommonQuery::from_params(&params);
    Ok(Json(type_count(&state, &cq).await))
}

/// Grouped status counts; failures degrade to the zero-value structure.
pub(crate) async fn status_count(state: &AppState, cq: &CommonQuery) -> ProjectStatusCount {
    match state.projects.count_by_status(cq).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Error counting projects: {}", e);
            ProjectStatusCount::default()
        }
    }
}

pub(crate) async fn type_count(state: &AppState, cq: &CommonQuery) -> Vec<TypeCount> {
    match state.projects.count_by_type(cq).await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::warn!("Error counting projects by type: {}", e);
            vec![]
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub start_date: i64,
    #[serde(default)]
    pub end_date: i64,
    #[serde(default)]
    pub contributor: Vec<Uuid>,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl ProjectForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.name = self.name.trim().to_string();
        self.kind = self.kind.trim().to_lowercase();

        let mut errors = HashMap::new();
        if self.name.is_empty() || self.name.len() > 100 {
            errors.insert("name".to_string(), "Name must be between 1 and 100 characters".to_string());
        }
        if ProjectKind::parse(&self.kind).is_none() {
            errors.insert("type".to_string(), "Invalid project type".to_string());
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
            return Err(ApiError::validation_error("Invalid project form", Some(errors)));
        }
        Ok(self)
    }
}

/// POST /api/project
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(form): Json<ProjectForm>,
) -> ApiResult<Json<ProjectPayload>> {
    let form = form.validate()?;

    let start_date =
        millis_to_utc(form.start_date).ok_or_else(|| ApiError::bad_request("Invalid start date"))?;
    let end_date =
        millis_to_utc(form.end_date).ok_or_else(|| ApiError::bad_request("Invalid end date"))?;

    // The creator always ends up on the contributor list.
    let mut contributor = form.contributor;
    if !contributor.contains(&auth.user_id) {
        contributor.push(auth.user_id);
    }

    let project = Project {
        id: Uuid::new_v4(),
        name: form.name,
        description: form.description,
        kind: form.kind,
        start_date,
        end_date,
        contributor,
        attachments: form.attachments,
        status: ProjectStatus::Active.as_str().to_string(),
        logo: form.logo,
        created_at: Utc::now(),
        deleted_at: None,
    };

    let created = state.projects.insert(&project).await?;
    let mut payloads = decorate(&state, vec![created]).await;
    Ok(Json(payloads.remove(0)))
}

/// DELETE /api/project/:id
///
/// Tombstones the project and cascades to its tasks.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let project = state
        .projects
        .find_one_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    state.projects.soft_delete(project.id).await?;
    state.tasks.soft_delete_by_project(project.id).await?;

    Ok(Json(MessageResponse::new("Project deleted")))
}
