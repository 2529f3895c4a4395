use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use service_core::error::AppError;

use crate::{dtos::SectionSearchQuery, AppState};

/// Raw curriculum document for one section. Public.
pub async fn section_search(
    State(state): State<AppState>,
    Query(query): Query<SectionSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let body = state
        .curriculum
        .get_json_by_qtr_enroll_cd(&query.qtr, &query.enroll_code)
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
