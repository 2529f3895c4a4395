use crate::models::{NewPersonalSchedule, PersonalSchedule};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{info, instrument};

use super::lock;

const SCHEDULE_COLUMNS: &str = "id, user_id, name, description, quarter";

#[async_trait]
pub trait PersonalScheduleRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<PersonalSchedule>, AppError>;
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PersonalSchedule>, AppError>;
    async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PersonalSchedule>, AppError>;
    async fn save(&self, schedule: NewPersonalSchedule) -> Result<PersonalSchedule, AppError>;
    async fn update(&self, schedule: &PersonalSchedule) -> Result<PersonalSchedule, AppError>;
    async fn delete(&self, schedule: &PersonalSchedule) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgPersonalScheduleRepository {
    pool: PgPool,
}

impl PgPersonalScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonalScheduleRepository for PgPersonalScheduleRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<PersonalSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, PersonalSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM personal_schedules ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    #[instrument(skip(self))]
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PersonalSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, PersonalSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM personal_schedules WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PersonalSchedule>, AppError> {
        let schedule = sqlx::query_as::<_, PersonalSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM personal_schedules WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(schedule)
    }

    #[instrument(skip(self, schedule), fields(user_id = schedule.user_id))]
    async fn save(&self, schedule: NewPersonalSchedule) -> Result<PersonalSchedule, AppError> {
        let saved = sqlx::query_as::<_, PersonalSchedule>(&format!(
            r#"
            INSERT INTO personal_schedules (user_id, name, description, quarter)
            VALUES ($1, $2, $3, $4)
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(schedule.user_id)
        .bind(&schedule.name)
        .bind(&schedule.description)
        .bind(&schedule.quarter)
        .fetch_one(&self.pool)
        .await?;

        info!(ps_id = saved.id, "Personal schedule created");
        Ok(saved)
    }

    #[instrument(skip(self, schedule), fields(ps_id = schedule.id))]
    async fn update(&self, schedule: &PersonalSchedule) -> Result<PersonalSchedule, AppError> {
        let updated = sqlx::query_as::<_, PersonalSchedule>(&format!(
            r#"
            UPDATE personal_schedules
            SET name = $2, description = $3, quarter = $4
            WHERE id = $1
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(schedule.id)
        .bind(&schedule.name)
        .bind(&schedule.description)
        .bind(&schedule.quarter)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    #[instrument(skip(self, schedule), fields(ps_id = schedule.id))]
    async fn delete(&self, schedule: &PersonalSchedule) -> Result<(), AppError> {
        sqlx::query("DELETE FROM personal_schedules WHERE id = $1")
            .bind(schedule.id)
            .execute(&self.pool)
            .await?;

        info!("Personal schedule deleted");
        Ok(())
    }
}

/// In-memory schedule table that also records deletions.
#[derive(Default)]
pub struct MockPersonalScheduleRepository {
    schedules: Mutex<Vec<PersonalSchedule>>,
    deleted: Mutex<Vec<PersonalSchedule>>,
}

impl MockPersonalScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(self, schedule: PersonalSchedule) -> Self {
        if let Ok(mut schedules) = self.schedules.lock() {
            schedules.push(schedule);
        }
        self
    }

    /// Schedules passed to `delete`, in call order.
    pub fn deleted(&self) -> Vec<PersonalSchedule> {
        self.deleted
            .lock()
            .map(|deleted| deleted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PersonalScheduleRepository for MockPersonalScheduleRepository {
    async fn find_all(&self) -> Result<Vec<PersonalSchedule>, AppError> {
        Ok(lock(&self.schedules, "schedules")?.clone())
    }

    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PersonalSchedule>, AppError> {
        Ok(lock(&self.schedules, "schedules")?
            .iter()
            .filter(|schedule| schedule.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PersonalSchedule>, AppError> {
        Ok(lock(&self.schedules, "schedules")?
            .iter()
            .find(|schedule| schedule.id == id && schedule.user_id == user_id)
            .cloned())
    }

    async fn save(&self, schedule: NewPersonalSchedule) -> Result<PersonalSchedule, AppError> {
        let mut schedules = lock(&self.schedules, "schedules")?;
        let saved = PersonalSchedule {
            id: schedules.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            user_id: schedule.user_id,
            name: schedule.name,
            description: schedule.description,
            quarter: schedule.quarter,
        };
        schedules.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, schedule: &PersonalSchedule) -> Result<PersonalSchedule, AppError> {
        let mut schedules = lock(&self.schedules, "schedules")?;
        let existing = schedules
            .iter_mut()
            .find(|s| s.id == schedule.id)
            .ok_or_else(|| AppError::not_found("PersonalSchedule", schedule.id))?;
        *existing = schedule.clone();
        Ok(schedule.clone())
    }

    async fn delete(&self, schedule: &PersonalSchedule) -> Result<(), AppError> {
        lock(&self.schedules, "schedules")?.retain(|s| s.id != schedule.id);
        lock(&self.deleted, "deleted schedules")?.push(schedule.clone());
        Ok(())
    }
}
