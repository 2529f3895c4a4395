//! Sections of the courses saved in a personal schedule.
//!
//! Listing resolves every saved enroll code against the curriculum API.
//! Deletion removes one saved code after the API confirms it still exists
//! for the schedule's quarter.

use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use super::personal_schedules::find_owned_schedule;
use crate::{
    dtos::{MessageResponse, PersonalSectionQuery, PsIdQuery},
    middleware::CurrentUser,
    models::Course,
    services::curriculum::is_error_document,
    AppState,
};

pub async fn list_personal_sections(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<PsIdQuery>,
) -> Result<Json<Vec<Course>>, AppError> {
    let schedule = find_owned_schedule(&state, query.ps_id, current_user.user.id).await?;
    let saved = state.ps_courses.find_all_by_ps_id(schedule.id).await?;

    tracing::info!(
        ps_id = schedule.id,
        quarter = %schedule.quarter,
        courses = saved.len(),
        "Listing personal sections"
    );

    let mut sections = Vec::with_capacity(saved.len());
    for course in &saved {
        let body = state
            .curriculum
            .get_json_by_qtr_enroll_cd(&schedule.quarter, &course.enroll_cd)
            .await?;

        if is_error_document(&body) {
            tracing::warn!(
                enroll_cd = %course.enroll_cd,
                response = %body,
                "Skipping enroll code the curriculum API did not resolve"
            );
            continue;
        }

        let section: Course = serde_json::from_str(&body).map_err(|e| {
            AppError::BadGateway(format!(
                "Unreadable course document for enroll code {}: {}",
                course.enroll_cd, e
            ))
        })?;
        sections.push(section);
    }

    Ok(Json(sections))
}

pub async fn delete_personal_section(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<PersonalSectionQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let schedule = find_owned_schedule(&state, query.ps_id, current_user.user.id).await?;

    let course = state
        .ps_courses
        .find_all_by_ps_id(schedule.id)
        .await?
        .into_iter()
        .find(|course| course.enroll_cd == query.enroll_cd)
        .ok_or_else(|| AppError::not_found("PSCourse", &query.enroll_cd))?;

    let confirmed = match state
        .curriculum
        .get_all_sections(&query.enroll_cd, &schedule.quarter)
        .await
    {
        Ok(body) => {
            let valid = serde_json::from_str::<serde_json::Value>(&body)
                .map(|document| document.get("error").is_none())
                .unwrap_or(false);
            if !valid {
                tracing::warn!(response = %body, "Curriculum API did not confirm enroll code");
            }
            valid
        }
        Err(e) => {
            tracing::warn!(error = %e, "Curriculum API lookup failed");
            false
        }
    };

    if !confirmed {
        return Err(AppError::not_found("PSCourse", &query.enroll_cd));
    }

    state.ps_courses.delete(&course).await?;

    tracing::info!(
        ps_id = schedule.id,
        enroll_cd = %course.enroll_cd,
        "Personal section deleted"
    );

    Ok(Json(MessageResponse::new(format!(
        "Personal Schedule with psId {} and lectures and affiliated sections with enrollCd {} deleted",
        query.ps_id, query.enroll_cd
    ))))
}
