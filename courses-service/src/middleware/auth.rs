use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use service_core::error::AppError;

use crate::{
    models::{NewUser, User},
    services::AccessTokenClaims,
    AppState,
};

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// The authenticated caller and the roles granted to them.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

/// Verify the bearer token, load the caller's user row and attach a
/// [`CurrentUser`] to the request. Anything short of a valid token is a 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::forbidden("Missing or invalid Authorization header"))?;

    let claims = state.jwt.validate_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        AppError::forbidden("Invalid or expired token")
    })?;

    let user = state.users.find_or_create(new_user_from(&claims)).await?;
    let roles = roles_for(&state, &claims, &user);

    tracing::Span::current().record("user_id", user.id);
    req.extensions_mut().insert(CurrentUser { user, roles });

    Ok(next.run(req).await)
}

fn new_user_from(claims: &AccessTokenClaims) -> NewUser {
    NewUser {
        email: claims.email.clone(),
        google_sub: claims.sub.clone(),
        full_name: claims.name.clone(),
        given_name: claims.given_name.clone().unwrap_or_default(),
        family_name: claims.family_name.clone().unwrap_or_default(),
        picture_url: claims.picture.clone().unwrap_or_default(),
        email_verified: claims.email_verified,
    }
}

fn roles_for(state: &AppState, claims: &AccessTokenClaims, user: &User) -> Vec<String> {
    let mut roles = vec![ROLE_USER.to_string()];
    let admin = user.admin
        || state.config.is_admin_email(&user.email)
        || claims.roles.iter().any(|role| role == ROLE_ADMIN);
    if admin {
        roles.push(ROLE_ADMIN.to_string());
    }
    roles
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::forbidden("Authentication required"))
    }
}
