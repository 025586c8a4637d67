pub mod auth;

pub use auth::{require_admin_or_maintainer, require_auth, require_basic_auth, AuthUser};
