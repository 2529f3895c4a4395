//! Personal schedule model: a user's named plan for one academic quarter.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSchedule {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    /// Academic quarter as `yyyyq`, e.g. `20221` for Winter 2022.
    pub quarter: String,
}

#[derive(Debug, Clone)]
pub struct NewPersonalSchedule {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub quarter: String,
}

/// Accepts `yyyyq` where `q` is 1 (Winter) through 4 (Fall).
pub fn validate_quarter(quarter: &str) -> Result<(), ValidationError> {
    let bytes = quarter.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes.iter().all(u8::is_ascii_digit)
        && (b'1'..=b'4').contains(&bytes[4]);

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("quarter");
        err.message = Some("quarter must be in yyyyq format with q between 1 and 4".into());
        Err(err)
    }
}
