pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, role: &str, expiry_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            exp: (now + Duration::days(expiry_days)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token")]
    InvalidToken,
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig { jwt_secret: "test-secret".to_string(), jwt_expiry_days: 7 }
    }

    #[test]
    fn token_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "developer", 7);
        let token = generate_jwt(&claims, &security()).unwrap();

        let decoded = verify_jwt(&token, &security()).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.role(), Some(Role::Developer));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "admin", 7);
        let token = generate_jwt(&claims, &security()).unwrap();

        let other = SecurityConfig { jwt_secret: "other".to_string(), jwt_expiry_days: 7 };
        assert!(matches!(verify_jwt(&token, &other), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let empty = SecurityConfig { jwt_secret: String::new(), jwt_expiry_days: 7 };
        let claims = Claims::new(Uuid::new_v4(), "admin", 7);
        assert!(matches!(generate_jwt(&claims, &empty), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(verify_jwt("not-a-jwt", &security()), Err(JwtError::InvalidToken)));
    }
}
