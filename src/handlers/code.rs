//! Verification-code issuance, guarded by basic auth.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::password::random_string;
use crate::database::models::VerificationCode;
use crate::error::{ApiError, ApiResult};
use crate::mail::template;
use crate::state::AppState;

/// POST /api/verification-code/:email
///
/// Always answers with the same message so the endpoint cannot be used to
/// probe which addresses have accounts.
pub async fn create(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }

    let response = MessageResponse::new("Success, please check your email");

    let user = match state.users.find_one_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(Json(response)),
        Err(e) => {
            tracing::error!("Error finding user by email: {}", e);
            return Ok(Json(response));
        }
    };

    let vcode = &state.config.vcode;
    let code = VerificationCode {
        id: Uuid::new_v4(),
        user_id: user.id,
        email: user.email.clone(),
        code: random_string(vcode.length),
        used: false,
        expires_at: Utc::now() + Duration::minutes(vcode.expiry_minutes),
        created_at: Utc::now(),
    };

    if let Err(e) = state.codes.insert(&code).await {
        tracing::error!("Error inserting verification code: {}", e);
        return Ok(Json(response));
    }

    let mailer = state.mailer.clone();
    let expiry_minutes = vcode.expiry_minutes;
    tokio::spawn(async move {
        let body = template::verification_code(&code.code, expiry_minutes);
        if let Err(e) = mailer.send(&code.email, "Verification Code", &body).await {
            tracing::error!("Error sending email: {}", e);
        }
    });

    Ok(Json(response))
}
