//! Public authentication endpoints: login, register, forgot-password.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::password::{hash_password, random_string, verify_password};
use crate::auth::{generate_jwt, Claims};
use crate::database::models::User;
use crate::error::{ApiError, ApiResult};
use crate::mail::template;
use crate::state::AppState;
use crate::types::Role;

const MIN_NAME_LEN: usize = 1;
const MAX_NAME_LEN: usize = 50;
const MIN_EMAIL_LEN: usize = 3;
const MAX_EMAIL_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 50;

const GENERATED_PASSWORD_LEN: usize = 10;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.email = self.email.trim().to_lowercase();

        let mut errors = HashMap::new();
        validate_email(&self.email, &mut errors);
        validate_password(&self.password, &mut errors);
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Invalid login form", Some(errors)));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        let mut errors = HashMap::new();
        if self.name.len() < MIN_NAME_LEN || self.name.len() > MAX_NAME_LEN {
            errors.insert(
                "name".to_string(),
                format!("Name must be between {} and {} characters", MIN_NAME_LEN, MAX_NAME_LEN),
            );
        }
        validate_email(&self.email, &mut errors);
        validate_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.insert(
                "confirm_password".to_string(),
                "Password and confirm password must match".to_string(),
            );
        }
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Invalid register form", Some(errors)));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordForm {
    fn validate(mut self) -> ApiResult<Self> {
        self.email = self.email.trim().to_lowercase();

        let mut errors = HashMap::new();
        validate_email(&self.email, &mut errors);
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Invalid form", Some(errors)));
        }
        Ok(self)
    }
}

fn validate_email(email: &str, errors: &mut HashMap<String, String>) {
    if email.len() < MIN_EMAIL_LEN || email.len() > MAX_EMAIL_LEN {
        errors.insert(
            "email".to_string(),
            format!("Email must be between {} and {} characters", MIN_EMAIL_LEN, MAX_EMAIL_LEN),
        );
    } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        errors.insert("email".to_string(), "Invalid email format".to_string());
    }
}

fn validate_password(password: &str, errors: &mut HashMap<String, String>) {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        errors.insert(
            "password".to_string(),
            format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
            ),
        );
    }
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let form = form.validate()?;

    let user = state
        .users
        .find_one_by_email(&form.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("Wrong email or password"))?;

    if !verify_password(&form.password, &user.password) {
        return Err(ApiError::bad_request("Wrong email or password"));
    }

    let claims = Claims::new(user.id, &user.role, state.config.security.jwt_expiry_days);
    let token = generate_jwt(&claims, &state.config.security).map_err(|e| {
        tracing::error!("Error creating token: {}", e);
        ApiError::internal_server_error("There was an error, please try again")
    })?;

    Ok(Json(TokenResponse { token: format!("Bearer {}", token) }))
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> ApiResult<Json<User>> {
    let form = form.validate()?;

    if state.users.find_one_by_email(&form.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password = hash_password(&form.password).map_err(|e| {
        tracing::error!("Error hashing password: {}", e);
        ApiError::internal_server_error("There was an error, please try again")
    })?;

    let user = User {
        id: Uuid::new_v4(),
        email: form.email,
        password,
        name: form.name,
        role: Role::Developer.as_str().to_string(),
        position: "Other".to_string(),
        avatar: String::new(),
        phone: String::new(),
        created_at: Utc::now(),
        deleted_at: None,
    };

    let created = state.users.insert(&user).await?;
    Ok(Json(created))
}

/// POST /api/forgot-password
///
/// Replaces the password with a generated one and mails it. Delivery runs in
/// the background; a send failure is logged, not surfaced.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> ApiResult<Json<MessageResponse>> {
    let form = form.validate()?;

    let mut user = state
        .users
        .find_one_by_email(&form.email)
        .await?
        .ok_or_else(|| ApiError::not_found("Email not found"))?;

    let new_password = random_string(GENERATED_PASSWORD_LEN);
    user.password = hash_password(&new_password).map_err(|e| {
        tracing::error!("Error hashing password: {}", e);
        ApiError::internal_server_error("There was an error, please try again")
    })?;

    state.users.update(&user).await?;

    let mailer = state.mailer.clone();
    let email = user.email.clone();
    tokio::spawn(async move {
        let body = template::new_password(&new_password);
        if let Err(e) = mailer.send(&email, "New Password", &body).await {
            tracing::error!("Error sending email: {}", e);
        }
    });

    Ok(Json(MessageResponse::new("New password has been sent to your email")))
}
