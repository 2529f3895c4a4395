pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use service_core::middleware::{
    csrf::csrf_middleware,
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, request_id_of},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use handlers::{courses, personal_schedules, personal_sections, sections, todos, users};
use middleware::{auth_middleware, require_admin};
use services::{
    CurriculumService, JwtService, PersonalScheduleRepository, PsCourseRepository, TodoRepository,
    UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when running against in-memory repositories.
    pub db: Option<PgPool>,
    pub jwt: JwtService,
    pub users: Arc<dyn UserRepository>,
    pub personal_schedules: Arc<dyn PersonalScheduleRepository>,
    pub ps_courses: Arc<dyn PsCourseRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub curriculum: Arc<dyn CurriculumService>,
}

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/admin/users", get(users::list_users))
        .route("/api/todos/admin/all", get(todos::list_all_todos))
        .route(
            "/api/personalschedules/admin/all",
            get(personal_schedules::list_all_schedules),
        )
        .route("/api/courses/admin/all", get(courses::list_all_courses))
        .route_layer(from_fn(require_admin));

    let authenticated = Router::new()
        .route("/api/currentUser", get(users::current_user))
        .route(
            "/api/personalSections/all",
            get(personal_sections::list_personal_sections),
        )
        .route(
            "/api/personalSections/delete",
            delete(personal_sections::delete_personal_section),
        )
        .route("/api/todos/all", get(todos::list_todos))
        .route("/api/todos/post", post(todos::create_todo))
        .route(
            "/api/todos",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route(
            "/api/personalschedules/all",
            get(personal_schedules::list_schedules),
        )
        .route(
            "/api/personalschedules/post",
            post(personal_schedules::create_schedule),
        )
        .route(
            "/api/personalschedules",
            get(personal_schedules::get_schedule)
                .put(personal_schedules::update_schedule)
                .delete(personal_schedules::delete_schedule),
        )
        .route("/api/courses/user/all", get(courses::list_user_courses))
        .route(
            "/api/courses/user/psid/all",
            get(courses::list_schedule_courses),
        )
        .route("/api/courses/post", post(courses::add_course))
        .route("/api/courses/user", delete(courses::delete_course))
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/sections/sectionsearch", get(sections::section_search))
        .merge(authenticated)
        .layer(from_fn(csrf_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
