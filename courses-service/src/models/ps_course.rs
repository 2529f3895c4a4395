use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One enroll code saved into a personal schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PsCourse {
    pub id: i64,
    pub user_id: i64,
    pub enroll_cd: String,
    pub ps_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewPsCourse {
    pub user_id: i64,
    pub enroll_cd: String,
    pub ps_id: i64,
}
