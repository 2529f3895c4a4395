//! Enroll codes saved into personal schedules.

use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use super::personal_schedules::find_owned_schedule;
use crate::{
    dtos::{AddCourseQuery, IdQuery, MessageResponse, PsIdQuery},
    middleware::CurrentUser,
    models::{NewPsCourse, PsCourse},
    services::curriculum::is_error_document,
    AppState,
};

pub async fn list_all_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<PsCourse>>, AppError> {
    Ok(Json(state.ps_courses.find_all().await?))
}

pub async fn list_user_courses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<PsCourse>>, AppError> {
    Ok(Json(
        state.ps_courses.find_all_by_user(current_user.user.id).await?,
    ))
}

pub async fn list_schedule_courses(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<PsIdQuery>,
) -> Result<Json<Vec<PsCourse>>, AppError> {
    let schedule = find_owned_schedule(&state, query.ps_id, current_user.user.id).await?;
    Ok(Json(state.ps_courses.find_all_by_ps_id(schedule.id).await?))
}

pub async fn add_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AddCourseQuery>,
) -> Result<Json<PsCourse>, AppError> {
    let schedule = find_owned_schedule(&state, query.ps_id, current_user.user.id).await?;

    let body = state
        .curriculum
        .get_all_sections(&query.enroll_cd, &schedule.quarter)
        .await?;
    if is_error_document(&body) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "enroll code {} is not valid for quarter {}",
            query.enroll_cd,
            schedule.quarter
        )));
    }

    let already_saved = state
        .ps_courses
        .find_all_by_ps_id(schedule.id)
        .await?
        .iter()
        .any(|course| course.enroll_cd == query.enroll_cd);
    if already_saved {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "enroll code {} is already in personal schedule {}",
            query.enroll_cd,
            schedule.id
        )));
    }

    let saved = state
        .ps_courses
        .save(NewPsCourse {
            user_id: current_user.user.id,
            enroll_cd: query.enroll_cd,
            ps_id: schedule.id,
        })
        .await?;

    Ok(Json(saved))
}

pub async fn delete_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let course = state
        .ps_courses
        .find_by_id_and_user(query.id, current_user.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("PSCourse", query.id))?;

    state.ps_courses.delete(&course).await?;

    Ok(Json(MessageResponse::new(format!(
        "PSCourse with id {} deleted",
        course.id
    ))))
}
