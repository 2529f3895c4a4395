use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::AppError;

use super::auth::CurrentUser;

/// Route layer for `/admin` endpoints. Must run after `auth_middleware`.
pub async fn require_admin(
    current_user: CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !current_user.is_admin() {
        tracing::warn!(user_id = current_user.user.id, "Non-admin denied admin endpoint");
        return Err(AppError::forbidden("Access is denied"));
    }
    Ok(next.run(request).await)
}
