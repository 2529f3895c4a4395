pub mod admin;
pub mod auth;

pub use admin::require_admin;
pub use auth::{auth_middleware, CurrentUser, ROLE_ADMIN, ROLE_USER};
