//! User endpoints: paginated directory with project-count decoration and
//! the active/not-active summary.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{ActiveUserCount, User};
use crate::error::ApiResult;
use crate::filter::{CommonQuery, ListParams, PageEnvelope, DEFAULT_PAGE_SIZE};
use crate::state::AppState;

/// User plus response-only decorations. The password hash never serializes.
#[derive(Debug, Serialize)]
pub struct UserPayload {
    #[serde(flatten)]
    pub user: User,
    pub avatar_url: Option<String>,
    pub total_project: i64,
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageEnvelope<UserPayload>>> {
    let mut cq = CommonQuery::from_params(&params);
    let limit = *cq.limit.get_or_insert(DEFAULT_PAGE_SIZE);
    let page = cq.page;

    let users = state.users.find_all(&cq).await?;

    // Project totals are decoration; a failure leaves them at zero.
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let totals: HashMap<Uuid, i64> = match state.projects.count_for_users(&ids).await {
        Ok(rows) => rows.into_iter().collect(),
        Err(e) => {
            tracing::warn!("Error counting projects per user: {}", e);
            HashMap::new()
        }
    };

    let assets = &state.config.assets;
    let payloads = users
        .into_iter()
        .map(|user| {
            let avatar_url = assets.url_for(&assets.avatar_dir, &user.avatar);
            let total_project = totals.get(&user.id).copied().unwrap_or(0);
            UserPayload { user, avatar_url, total_project }
        })
        .collect();

    let mut count_cq = cq.clone();
    count_cq.reset_pagination();
    let total = state.users.count(&count_cq).await?;

    Ok(Json(PageEnvelope::new(payloads, total, page, limit)))
}

/// GET /api/user/count
pub async fn count(State(state): State<AppState>) -> ApiResult<Json<ActiveUserCount>> {
    let count = match state.users.active_user_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Error counting active users: {}", e);
            ActiveUserCount::default()
        }
    };
    Ok(Json(count))
}
