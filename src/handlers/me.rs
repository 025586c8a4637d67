//! Caller-scoped endpoints. These reuse the resource handlers' helpers with
//! the contributor filter pinned to the authenticated user.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::project::{project_page, status_count as project_status_count, type_count, ProjectPayload};
use super::schedule::{schedule_list, SchedulePayload};
use super::task::{overview_weeks, status_count as task_status_count, status_group};
use crate::auth::password::{hash_password, verify_password};
use crate::database::models::{
    ProjectStatusCount, Task, TaskGroup, TaskOverviewWeek, TaskStatusCount, TypeCount, User,
};
use crate::error::{ApiError, ApiResult};
use crate::filter::{CommonQuery, ListParams, PageEnvelope};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::is_valid_position;

/// Caller-pinned query: whatever else the caller filters on, the contributor
/// filter is their own id.
fn my_query(params: &ListParams, auth: &AuthUser) -> CommonQuery {
    let mut cq = CommonQuery::from_params(params);
    cq.user_id = Some(auth.user_id);
    cq
}

async fn current_user(state: &AppState, auth: &AuthUser) -> ApiResult<User> {
    state
        .users
        .find_one_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// When enabled, profile mutations must present the latest mailed code; a
/// matching code is consumed on use.
async fn check_vcode(state: &AppState, user_id: Uuid, supplied: &str) -> ApiResult<()> {
    if !state.config.vcode.check_enabled {
        return Ok(());
    }

    let code = state
        .codes
        .find_active_one_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid verification code"))?;

    if supplied.is_empty() || supplied != code.code {
        return Err(ApiError::bad_request("Invalid verification code"));
    }

    state.codes.mark_used(code.id).await?;
    Ok(())
}

/// GET /api/me
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(current_user(&state, &auth).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub verification_code: String,
}

/// PUT /api/me
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(form): Json<UpdateProfileForm>,
) -> ApiResult<Json<User>> {
    let mut user = current_user(&state, &auth).await?;

    check_vcode(&state, auth.user_id, &form.verification_code).await?;

    let mut errors = HashMap::new();
    if let Some(name) = form.name {
        let name = name.trim().to_string();
        if name.is_empty() || name.len() > 50 {
            errors.insert("name".to_string(), "Name must be between 1 and 50 characters".to_string());
        } else {
            user.name = name;
        }
    }
    if let Some(email) = form.email {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            errors.insert("email".to_string(), "Invalid email format".to_string());
        } else {
            user.email = email;
        }
    }
    if let Some(position) = form.position {
        if !is_valid_position(&position) {
            errors.insert("position".to_string(), "Invalid position".to_string());
        } else {
            user.position = position;
        }
    }
    if let Some(phone) = form.phone {
        user.phone = phone.trim().to_string();
    }
    if let Some(avatar) = form.avatar {
        if !avatar.is_empty() {
            user.avatar = avatar;
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::validation_error("Invalid profile form", Some(errors)));
    }

    let updated = state
        .users
        .update(&user)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordForm {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub verification_code: String,
}

/// PUT /api/me/password
pub async fn update_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(form): Json<UpdatePasswordForm>,
) -> ApiResult<Json<User>> {
    let mut user = current_user(&state, &auth).await?;

    if !verify_password(&form.old_password, &user.password) {
        return Err(ApiError::bad_request("Wrong old password"));
    }
    if form.new_password.len() < 6 || form.new_password.len() > 50 {
        return Err(ApiError::bad_request("Password must be between 6 and 50 characters"));
    }

    check_vcode(&state, auth.user_id, &form.verification_code).await?;

    user.password = hash_password(&form.new_password).map_err(|e| {
        tracing::error!("Error hashing password: {}", e);
        ApiError::internal_server_error("There was an error, please try again")
    })?;

    let updated = state
        .users
        .update(&user)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(updated))
}

/// GET /api/me/schedules
pub async fn schedules(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SchedulePayload>>> {
    let cq = my_query(&params, &auth);
    Ok(Json(schedule_list(&state, &cq).await?))
}

/// GET /api/me/projects
pub async fn projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageEnvelope<ProjectPayload>>> {
    let cq = my_query(&params, &auth);
    Ok(Json(project_page(&state, cq).await?))
}

/// GET /api/me/project/count
pub async fn project_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ProjectStatusCount>> {
    let cq = my_query(&params, &auth);
    Ok(Json(project_status_count(&state, &cq).await))
}

/// GET /api/me/project/count/type
pub async fn project_count_by_type(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TypeCount>>> {
    let cq = my_query(&params, &auth);
    Ok(Json(type_count(&state, &cq).await))
}

/// GET /api/me/tasks
pub async fn tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let cq = my_query(&params, &auth);
    Ok(Json(state.tasks.find_all(&cq).await?))
}

/// GET /api/me/task/count
pub async fn task_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<TaskStatusCount>> {
    let cq = my_query(&params, &auth);
    Ok(Json(task_status_count(&state, &cq).await))
}

/// GET /api/me/task/overview
pub async fn task_overview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TaskOverviewWeek>>> {
    let cq = my_query(&params, &auth);
    Ok(Json(overview_weeks(&state, cq).await))
}

/// GET /api/me/task/status
pub async fn task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<TaskGroup>> {
    let cq = my_query(&params, &auth);
    Ok(Json(status_group(&state, cq).await))
}
