use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::{CurrentUserResponse, RoleResponse},
    middleware::CurrentUser,
    models::User,
    AppState,
};

pub async fn current_user(current_user: CurrentUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user: current_user.user,
        roles: current_user
            .roles
            .into_iter()
            .map(|authority| RoleResponse { authority })
            .collect(),
    })
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.find_all().await?))
}
