use crate::models::{NewPsCourse, PsCourse};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{info, instrument};

use super::lock;

const COURSE_COLUMNS: &str = "id, user_id, enroll_cd, ps_id";

#[async_trait]
pub trait PsCourseRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<PsCourse>, AppError>;
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PsCourse>, AppError>;
    async fn find_all_by_ps_id(&self, ps_id: i64) -> Result<Vec<PsCourse>, AppError>;
    async fn find_by_id_and_user(&self, id: i64, user_id: i64)
        -> Result<Option<PsCourse>, AppError>;
    async fn save(&self, course: NewPsCourse) -> Result<PsCourse, AppError>;
    async fn delete(&self, course: &PsCourse) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgPsCourseRepository {
    pool: PgPool,
}

impl PgPsCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PsCourseRepository for PgPsCourseRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<PsCourse>, AppError> {
        let courses = sqlx::query_as::<_, PsCourse>(&format!(
            "SELECT {COURSE_COLUMNS} FROM ps_courses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    #[instrument(skip(self))]
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PsCourse>, AppError> {
        let courses = sqlx::query_as::<_, PsCourse>(&format!(
            "SELECT {COURSE_COLUMNS} FROM ps_courses WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    #[instrument(skip(self))]
    async fn find_all_by_ps_id(&self, ps_id: i64) -> Result<Vec<PsCourse>, AppError> {
        let courses = sqlx::query_as::<_, PsCourse>(&format!(
            "SELECT {COURSE_COLUMNS} FROM ps_courses WHERE ps_id = $1 ORDER BY id"
        ))
        .bind(ps_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PsCourse>, AppError> {
        let course = sqlx::query_as::<_, PsCourse>(&format!(
            "SELECT {COURSE_COLUMNS} FROM ps_courses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    #[instrument(skip(self, course), fields(ps_id = course.ps_id, enroll_cd = %course.enroll_cd))]
    async fn save(&self, course: NewPsCourse) -> Result<PsCourse, AppError> {
        let saved = sqlx::query_as::<_, PsCourse>(&format!(
            r#"
            INSERT INTO ps_courses (user_id, enroll_cd, ps_id)
            VALUES ($1, $2, $3)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(course.user_id)
        .bind(&course.enroll_cd)
        .bind(course.ps_id)
        .fetch_one(&self.pool)
        .await?;

        info!(course_id = saved.id, "Course added to personal schedule");
        Ok(saved)
    }

    #[instrument(skip(self, course), fields(course_id = course.id, ps_id = course.ps_id))]
    async fn delete(&self, course: &PsCourse) -> Result<(), AppError> {
        sqlx::query("DELETE FROM ps_courses WHERE id = $1")
            .bind(course.id)
            .execute(&self.pool)
            .await?;

        info!(enroll_cd = %course.enroll_cd, "Course removed from personal schedule");
        Ok(())
    }
}

/// In-memory course table that records lookups by schedule and deletions.
#[derive(Default)]
pub struct MockPsCourseRepository {
    courses: Mutex<Vec<PsCourse>>,
    ps_id_lookups: Mutex<Vec<i64>>,
    deleted: Mutex<Vec<PsCourse>>,
}

impl MockPsCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(self, course: PsCourse) -> Self {
        if let Ok(mut courses) = self.courses.lock() {
            courses.push(course);
        }
        self
    }

    /// Arguments of every `find_all_by_ps_id` call, in call order.
    pub fn ps_id_lookups(&self) -> Vec<i64> {
        self.ps_id_lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }

    /// Courses passed to `delete`, in call order.
    pub fn deleted(&self) -> Vec<PsCourse> {
        self.deleted
            .lock()
            .map(|deleted| deleted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PsCourseRepository for MockPsCourseRepository {
    async fn find_all(&self) -> Result<Vec<PsCourse>, AppError> {
        Ok(lock(&self.courses, "courses")?.clone())
    }

    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PsCourse>, AppError> {
        Ok(lock(&self.courses, "courses")?
            .iter()
            .filter(|course| course.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all_by_ps_id(&self, ps_id: i64) -> Result<Vec<PsCourse>, AppError> {
        lock(&self.ps_id_lookups, "ps_id lookups")?.push(ps_id);
        Ok(lock(&self.courses, "courses")?
            .iter()
            .filter(|course| course.ps_id == ps_id)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PsCourse>, AppError> {
        Ok(lock(&self.courses, "courses")?
            .iter()
            .find(|course| course.id == id && course.user_id == user_id)
            .cloned())
    }

    async fn save(&self, course: NewPsCourse) -> Result<PsCourse, AppError> {
        let mut courses = lock(&self.courses, "courses")?;
        let saved = PsCourse {
            id: courses.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            user_id: course.user_id,
            enroll_cd: course.enroll_cd,
            ps_id: course.ps_id,
        };
        courses.push(saved.clone());
        Ok(saved)
    }

    async fn delete(&self, course: &PsCourse) -> Result<(), AppError> {
        lock(&self.courses, "courses")?.retain(|c| c.id != course.id);
        lock(&self.deleted, "deleted courses")?.push(course.clone());
        Ok(())
    }
}
