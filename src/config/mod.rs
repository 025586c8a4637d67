use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, loaded once at startup and shared through
/// `AppState`. Environment picks the defaults, individual env vars override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub basic_auth: BasicAuthConfig,
    pub vcode: VcodeConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
}

/// Credentials guarding the operational endpoint group (options, codes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcodeConfig {
    /// When false, profile/password updates skip the verification-code check.
    pub check_enabled: bool,
    pub length: usize,
    pub expiry_minutes: i64,
}

/// Object storage location used to decorate stored keys into absolute URLs.
/// Upload itself happens out of process; this service only stores keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub base_url: String,
    pub avatar_dir: String,
    pub logo_dir: String,
    pub file_dir: String,
}

impl AssetConfig {
    /// Absolute URL for a stored object key, or None for an empty key.
    pub fn url_for(&self, dir: &str, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        Some(format!("{}/{}/{}", self.base_url.trim_end_matches('/'), dir, key))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_DAYS") {
            self.security.jwt_expiry_days = v.parse().unwrap_or(self.security.jwt_expiry_days);
        }
        if let Ok(v) = env::var("BASIC_AUTH_USERNAME") {
            self.basic_auth.username = v;
        }
        if let Ok(v) = env::var("BASIC_AUTH_PASSWORD") {
            self.basic_auth.password = v;
        }
        if let Ok(v) = env::var("VCODE_CHECK_ENABLED") {
            self.vcode.check_enabled = v.parse().unwrap_or(self.vcode.check_enabled);
        }
        if let Ok(v) = env::var("VCODE_LENGTH") {
            self.vcode.length = v.parse().unwrap_or(self.vcode.length);
        }
        if let Ok(v) = env::var("VCODE_EXPIRY_MINUTES") {
            self.vcode.expiry_minutes = v.parse().unwrap_or(self.vcode.expiry_minutes);
        }
        if let Ok(v) = env::var("ASSET_BASE_URL") {
            self.assets.base_url = v;
        }
        if let Ok(v) = env::var("ASSET_AVATAR_DIR") {
            self.assets.avatar_dir = v;
        }
        if let Ok(v) = env::var("ASSET_LOGO_DIR") {
            self.assets.logo_dir = v;
        }
        if let Ok(v) = env::var("ASSET_FILE_DIR") {
            self.assets.file_dir = v;
        }
        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: "postgres://localhost/proman".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 7,
            },
            basic_auth: BasicAuthConfig {
                username: "proman".to_string(),
                password: String::new(),
            },
            vcode: VcodeConfig { check_enabled: true, length: 6, expiry_minutes: 15 },
            assets: AssetConfig {
                base_url: "https://assets.proman.local".to_string(),
                avatar_dir: "avatars".to_string(),
                logo_dir: "logos".to_string(),
                file_dir: "files".to_string(),
            },
        }
    }

    fn development() -> Self {
        let mut cfg = Self::base(Environment::Development);
        // Local development works out of the box without a code-check loop
        cfg.vcode.check_enabled = false;
        cfg.security.jwt_secret = "development-secret".to_string();
        cfg
    }

    fn staging() -> Self {
        Self::base(Environment::Staging)
    }

    fn production() -> Self {
        let mut cfg = Self::base(Environment::Production);
        cfg.database.max_connections = 20;
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let cfg = AppConfig::development();
        assert_eq!(cfg.server.port, 3000);
        assert!(!cfg.vcode.check_enabled);
        assert!(!cfg.security.jwt_secret.is_empty());
    }

    #[test]
    fn asset_url_decoration() {
        let cfg = AppConfig::development();
        assert_eq!(
            cfg.assets.url_for("avatars", "abc.png").as_deref(),
            Some("https://assets.proman.local/avatars/abc.png")
        );
        assert_eq!(cfg.assets.url_for("avatars", ""), None);
    }
}
