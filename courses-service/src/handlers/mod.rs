pub mod courses;
pub mod health;
pub mod personal_schedules;
pub mod personal_sections;
pub mod sections;
pub mod todos;
pub mod users;

pub use health::{health_check, metrics_endpoint, readiness_check};
