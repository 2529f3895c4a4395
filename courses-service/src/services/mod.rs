//! Services layer for courses-service.
//!
//! Repositories and the curriculum client sit behind traits so handlers can be
//! driven against PostgreSQL/HTTP in production and in-memory doubles in tests.

pub mod curriculum;
pub mod database;
mod jwt;
pub mod metrics;
pub mod personal_schedules;
pub mod ps_courses;
pub mod todos;
pub mod users;

pub use curriculum::{CurriculumCall, CurriculumService, MockCurriculumService, UcsbCurriculumClient};
pub use jwt::{AccessTokenClaims, JwtService};
pub use self::metrics::{init_metrics, render_metrics};
pub use personal_schedules::{
    MockPersonalScheduleRepository, PersonalScheduleRepository, PgPersonalScheduleRepository,
};
pub use ps_courses::{MockPsCourseRepository, PgPsCourseRepository, PsCourseRepository};
pub use todos::{MockTodoRepository, PgTodoRepository, TodoRepository};
pub use users::{MockUserRepository, PgUserRepository, UserRepository};

use service_core::error::AppError;
use std::sync::{Mutex, MutexGuard};

/// Lock one of the in-memory doubles' tables.
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, table: &str) -> Result<MutexGuard<'a, T>, AppError> {
    mutex
        .lock()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Mock {} mutex poisoned: {}", table, e)))
}
