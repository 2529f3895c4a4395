//! Test helpers for courses-service integration tests.
//!
//! Builds the real router over in-memory repositories and a scripted
//! curriculum API, and mints bearer tokens with a fixed secret.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use chrono::Duration;
use courses_service::{
    build_router,
    config::{AuthConfig, Config, CurriculumConfig, DatabaseConfig},
    models::{PersonalSchedule, PsCourse, Todo, User},
    services::{
        AccessTokenClaims, JwtService, MockCurriculumService, MockPersonalScheduleRepository,
        MockPsCourseRepository, MockTodoRepository, MockUserRepository,
    },
    AppState,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use service_core::config::{ObservabilityConfig, ServerConfig};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const JWT_SECRET: &str = "courses-test-secret";
pub const CSRF_TOKEN: &str = "test-csrf-token";
pub const USER_EMAIL: &str = "cgaucho@ucsb.edu";
pub const CONFIGURED_ADMIN_EMAIL: &str = "phtcon@ucsb.edu";

/// One lecture with a single discussion section, as returned by the
/// curriculum API for enroll code 08250 in 20221.
pub const ONE_COURSE: &str = r#"{
  "quarter": "20221",
  "courseId": "CMPSC   156  ",
  "title": "ADV APP PROGRAM",
  "contactHours": 40,
  "description": "Advanced application programming using a high-level, virtual-machine-based language.",
  "college": "ENGR",
  "objLevelCode": "U",
  "subjectArea": "CMPSC   ",
  "unitsFixed": 4,
  "unitsVariableHigh": null,
  "unitsVariableLow": null,
  "delayedSectioning": null,
  "inProgressCourse": null,
  "gradingOption": null,
  "instructionType": "LEC",
  "onLineCourse": false,
  "deptCode": "CMPSC",
  "generalEducation": [],
  "classSections": [
    {
      "enrollCode": "08250",
      "section": "0100",
      "session": null,
      "classClosed": null,
      "courseCancelled": null,
      "gradingOptionCode": null,
      "enrolledTotal": 52,
      "maxEnroll": 80,
      "secondaryStatus": null,
      "departmentApprovalRequired": false,
      "instructorApprovalRequired": false,
      "restrictionLevel": null,
      "restrictionMajor": "+PRCME+CMPCS+CMPEN",
      "restrictionMajorPass": "1",
      "restrictionMinor": null,
      "restrictionMinorPass": null,
      "concurrentCourses": [],
      "timeLocations": [
        {
          "room": "1930",
          "building": "BUCHN",
          "roomCapacity": 92,
          "days": " T R   ",
          "beginTime": "11:00",
          "endTime": "12:15"
        }
      ],
      "instructors": [
        { "instructor": "CONRAD P T", "functionCode": "Teaching and in charge" }
      ]
    },
    {
      "enrollCode": "08268",
      "section": "0101",
      "enrolledTotal": 26,
      "maxEnroll": 40,
      "timeLocations": [
        {
          "room": "1211",
          "building": "PHELP",
          "roomCapacity": 40,
          "days": "   W    ",
          "beginTime": "10:00",
          "endTime": "10:50"
        }
      ],
      "instructors": []
    }
  ]
}"#;

pub const ANOTHER_COURSE: &str = r#"{
  "quarter": "20221",
  "courseId": "MATH      3B ",
  "title": "CALC WITH APPLI 2",
  "unitsFixed": 4,
  "classSections": [{ "enrollCode": "29959", "section": "0100" }]
}"#;

pub fn test_config() -> Config {
    Config {
        service_name: "courses-service-test".to_string(),
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: Secret::new("postgres://localhost/unused".to_string()),
            max_connections: 1,
            min_connections: 0,
        },
        auth: AuthConfig {
            jwt_secret: Secret::new(JWT_SECRET.to_string()),
            admin_emails: vec![CONFIGURED_ADMIN_EMAIL.to_string()],
        },
        curriculum: CurriculumConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Secret::new("test-key".to_string()),
            timeout_secs: 1,
        },
        observability: ObservabilityConfig {
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub fn test_user() -> User {
    user(1, USER_EMAIL, false)
}

pub fn user(id: i64, email: &str, admin: bool) -> User {
    User {
        id,
        email: email.to_string(),
        google_sub: format!("sub-{}", id),
        full_name: "Chris Gaucho".to_string(),
        given_name: "Chris".to_string(),
        family_name: "Gaucho".to_string(),
        picture_url: String::new(),
        email_verified: true,
        admin,
    }
}

pub fn schedule(id: i64, user_id: i64, quarter: &str) -> PersonalSchedule {
    PersonalSchedule {
        id,
        user_id,
        name: "CS156".to_string(),
        description: "Winter plan".to_string(),
        quarter: quarter.to_string(),
    }
}

pub fn ps_course(id: i64, user_id: i64, enroll_cd: &str, ps_id: i64) -> PsCourse {
    PsCourse {
        id,
        user_id,
        enroll_cd: enroll_cd.to_string(),
        ps_id,
    }
}

pub fn todo(id: i64, user_id: i64, title: &str) -> Todo {
    Todo {
        id,
        user_id,
        title: title.to_string(),
        details: "details".to_string(),
        done: false,
    }
}

/// Seeds for the in-memory collaborators. `test_user()` is always present
/// with id 1.
pub struct TestAppBuilder {
    users: MockUserRepository,
    schedules: MockPersonalScheduleRepository,
    ps_courses: MockPsCourseRepository,
    todos: MockTodoRepository,
    curriculum: MockCurriculumService,
}

impl TestAppBuilder {
    pub fn with_user(mut self, user: User) -> Self {
        self.users = self.users.with_user(user);
        self
    }

    pub fn with_schedule(mut self, schedule: PersonalSchedule) -> Self {
        self.schedules = self.schedules.with_schedule(schedule);
        self
    }

    pub fn with_course(mut self, course: PsCourse) -> Self {
        self.ps_courses = self.ps_courses.with_course(course);
        self
    }

    pub fn with_todo(mut self, todo: Todo) -> Self {
        self.todos = self.todos.with_todo(todo);
        self
    }

    pub fn with_curriculum(mut self, curriculum: MockCurriculumService) -> Self {
        self.curriculum = curriculum;
        self
    }

    pub fn build(self) -> TestApp {
        let config = test_config();
        let jwt = JwtService::new(&config.auth.jwt_secret).expect("Failed to create JWT service");

        let users = Arc::new(self.users);
        let schedules = Arc::new(self.schedules);
        let ps_courses = Arc::new(self.ps_courses);
        let todos = Arc::new(self.todos);
        let curriculum = Arc::new(self.curriculum);

        let state = AppState {
            config,
            db: None,
            jwt: jwt.clone(),
            users: users.clone(),
            personal_schedules: schedules.clone(),
            ps_courses: ps_courses.clone(),
            todos: todos.clone(),
            curriculum: curriculum.clone(),
        };

        TestApp {
            router: build_router(state),
            jwt,
            users,
            schedules,
            ps_courses,
            todos,
            curriculum,
        }
    }
}

pub struct TestApp {
    router: Router,
    jwt: JwtService,
    pub users: Arc<MockUserRepository>,
    pub schedules: Arc<MockPersonalScheduleRepository>,
    pub ps_courses: Arc<MockPsCourseRepository>,
    pub todos: Arc<MockTodoRepository>,
    pub curriculum: Arc<MockCurriculumService>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            users: MockUserRepository::new().with_user(test_user()),
            schedules: MockPersonalScheduleRepository::new(),
            ps_courses: MockPsCourseRepository::new(),
            todos: MockTodoRepository::new(),
            curriculum: MockCurriculumService::new(),
        }
    }

    pub fn spawn() -> Self {
        Self::builder().build()
    }

    /// Bearer token for `test_user()`.
    pub fn user_token(&self) -> String {
        self.token_for(&test_user(), &[])
    }

    /// Bearer token for `test_user()` carrying the admin role claim.
    pub fn admin_token(&self) -> String {
        self.token_for(&test_user(), &["ROLE_ADMIN"])
    }

    pub fn token_for(&self, user: &User, roles: &[&str]) -> String {
        let claims = AccessTokenClaims::for_user(
            user,
            roles.iter().map(|role| role.to_string()).collect(),
            Duration::minutes(5),
        );
        self.jwt
            .issue_access_token(&claims)
            .expect("Failed to issue token")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, uri, token, Body::empty(), false))
            .await
    }

    /// State-changing request carrying a matching CSRF cookie and header.
    pub async fn mutate(&self, method: Method, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(method, uri, token, Body::empty(), true))
            .await
    }

    pub async fn mutate_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        let mut request = request(method, uri, token, Body::from(body.to_string()), true);
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/json".parse().expect("valid header"),
        );
        self.send(request).await
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Body,
    with_csrf: bool,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if with_csrf {
        builder = builder
            .header(header::COOKIE, format!("XSRF-TOKEN={}", CSRF_TOKEN))
            .header("X-XSRF-TOKEN", CSRF_TOKEN);
    }
    builder.body(body).expect("Failed to build request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
