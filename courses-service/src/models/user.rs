//! Application user, keyed by the email in the bearer token.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub google_sub: String,
    pub full_name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture_url: String,
    pub email_verified: bool,
    pub admin: bool,
}

/// Profile fields taken from a verified token, used to create the user on
/// first sight.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub google_sub: String,
    pub full_name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture_url: String,
    pub email_verified: bool,
}
