use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{personal_schedule::validate_quarter, User};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsIdQuery {
    pub ps_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSectionQuery {
    pub ps_id: i64,
    pub enroll_cd: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseQuery {
    pub enroll_cd: String,
    pub ps_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSearchQuery {
    pub qtr: String,
    pub enroll_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoQuery {
    pub title: String,
    pub details: String,
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    pub details: String,
    pub done: bool,
}

/// Fields of a personal schedule, used both for the `post` query string and
/// the `PUT` body.
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleFields {
    #[validate(length(min = 1, max = 15, message = "name must be 1 to 15 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_quarter"))]
    pub quarter: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub authority: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: User,
    pub roles: Vec<RoleResponse>,
}
