use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{IdQuery, MessageResponse, ScheduleFields},
    middleware::CurrentUser,
    models::{NewPersonalSchedule, PersonalSchedule},
    AppState,
};

/// The caller's schedule with `id`, or an entity-not-found error.
pub(crate) async fn find_owned_schedule(
    state: &AppState,
    id: i64,
    user_id: i64,
) -> Result<PersonalSchedule, AppError> {
    state
        .personal_schedules
        .find_by_id_and_user(id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("PersonalSchedule", id))
}

pub async fn list_all_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonalSchedule>>, AppError> {
    Ok(Json(state.personal_schedules.find_all().await?))
}

pub async fn list_schedules(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<PersonalSchedule>>, AppError> {
    Ok(Json(
        state
            .personal_schedules
            .find_all_by_user(current_user.user.id)
            .await?,
    ))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<PersonalSchedule>, AppError> {
    Ok(Json(
        find_owned_schedule(&state, query.id, current_user.user.id).await?,
    ))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(fields): Query<ScheduleFields>,
) -> Result<Json<PersonalSchedule>, AppError> {
    fields.validate()?;

    let saved = state
        .personal_schedules
        .save(NewPersonalSchedule {
            user_id: current_user.user.id,
            name: fields.name,
            description: fields.description,
            quarter: fields.quarter,
        })
        .await?;

    Ok(Json(saved))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
    Json(fields): Json<ScheduleFields>,
) -> Result<Json<PersonalSchedule>, AppError> {
    fields.validate()?;

    let mut schedule = find_owned_schedule(&state, query.id, current_user.user.id).await?;
    schedule.name = fields.name;
    schedule.description = fields.description;
    schedule.quarter = fields.quarter;

    Ok(Json(state.personal_schedules.update(&schedule).await?))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let schedule = find_owned_schedule(&state, query.id, current_user.user.id).await?;
    state.personal_schedules.delete(&schedule).await?;

    tracing::info!(ps_id = schedule.id, "Personal schedule deleted by owner");

    Ok(Json(MessageResponse::new(format!(
        "PersonalSchedule with id {} deleted",
        schedule.id
    ))))
}
