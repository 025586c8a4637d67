use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use uuid::Uuid;

use crate::auth::verify_jwt;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

/// Authenticated caller, resolved from the bearer token on every request so
/// a deleted or demoted user loses access immediately.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Bearer-token middleware for the `/api` group. Validates the JWT, loads
/// the caller, and injects [`AuthUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = verify_jwt(&token, &state.config.security)
        .map_err(|_| ApiError::unauthorized("Unauthorized"))?;

    // The token's role claim is advisory; the stored role wins.
    let user = state
        .users
        .find_one_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let role = Role::parse(&user.role).unwrap_or(Role::Developer);
    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role,
    });

    Ok(next.run(request).await)
}

/// Role guard for destructive endpoints. Must run after [`require_auth`].
pub async fn require_admin_or_maintainer(
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    if !auth.role.is_admin_or_maintainer() {
        return Err(ApiError::forbidden("Insufficient role"));
    }
    Ok(next.run(request).await)
}

/// HTTP basic auth for the operational endpoint group (options, codes).
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) = basic_credentials(request.headers())?;

    let expected = &state.config.basic_auth;
    if username != expected.username || password != expected.password {
        return Err(ApiError::unauthorized("Unauthorized"));
    }
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("Empty bearer token"));
    }
    Ok(token.to_string())
}

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Basic auth"))?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| ApiError::unauthorized("Invalid Basic auth encoding"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| ApiError::unauthorized("Invalid Basic auth credentials"))?;

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn basic_extraction() {
        let encoded = general_purpose::STANDARD.encode("ops:secret");
        let (user, pass) = basic_credentials(&headers(&format!("Basic {}", encoded))).unwrap();
        assert_eq!(user, "ops");
        assert_eq!(pass, "secret");

        assert!(basic_credentials(&headers("Basic ???")).is_err());
        assert!(basic_credentials(&headers("Bearer abc")).is_err());
    }
}
