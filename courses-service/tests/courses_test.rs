mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, ps_course, schedule, TestApp, ONE_COURSE};
use courses_service::services::MockCurriculumService;
use serde_json::json;

#[tokio::test]
async fn courses_require_authentication() {
    let app = TestApp::spawn();

    let response = app.get("/api/courses/user/all", None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_and_user_listings() {
    let app = TestApp::builder()
        .with_course(ps_course(1, 1, "08250", 1))
        .with_course(ps_course(2, 2, "29959", 2))
        .build();

    let own = body_json(app.get("/api/courses/user/all", Some(&app.user_token())).await).await;
    assert_eq!(
        own,
        json!([{ "id": 1, "userId": 1, "enrollCd": "08250", "psId": 1 }])
    );

    let response = app
        .get("/api/courses/admin/all", Some(&app.user_token()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let all = body_json(app.get("/api/courses/admin/all", Some(&app.admin_token())).await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn listing_by_schedule_requires_ownership() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .with_schedule(schedule(2, 2, "20221"))
        .with_course(ps_course(1, 1, "08250", 1))
        .build();
    let token = app.user_token();

    let own = body_json(app.get("/api/courses/user/psid/all?psId=1", Some(&token)).await).await;
    assert_eq!(own.as_array().map(Vec::len), Some(1));

    let response = app.get("/api/courses/user/psid/all?psId=2", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adds_code_confirmed_by_curriculum_api() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .with_curriculum(MockCurriculumService::new().with_all_sections("08250", "20221", ONE_COURSE))
        .build();

    let response = app
        .mutate(
            Method::POST,
            "/api/courses/post?enrollCd=08250&psId=1",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "userId": 1, "enrollCd": "08250", "psId": 1 })
    );
}

#[tokio::test]
async fn rejects_code_not_offered_in_quarter() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .build();

    let response = app
        .mutate(
            Method::POST,
            "/api/courses/post?enrollCd=99999&psId=1",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["type"], "IllegalArgumentException");
    assert_eq!(
        body["error"],
        "enroll code 99999 is not valid for quarter 20221"
    );
}

#[tokio::test]
async fn rejects_duplicate_code() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .with_course(ps_course(1, 1, "08250", 1))
        .with_curriculum(MockCurriculumService::new().with_all_sections("08250", "20221", ONE_COURSE))
        .build();

    let response = app
        .mutate(
            Method::POST,
            "/api/courses/post?enrollCd=08250&psId=1",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn adding_to_unowned_schedule_returns_404() {
    let app = TestApp::builder()
        .with_schedule(schedule(2, 2, "20221"))
        .build();

    let response = app
        .mutate(
            Method::POST,
            "/api/courses/post?enrollCd=08250&psId=2",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.curriculum.calls().is_empty());
}

#[tokio::test]
async fn deletes_own_course_only() {
    let app = TestApp::builder()
        .with_course(ps_course(1, 1, "08250", 1))
        .with_course(ps_course(2, 2, "29959", 2))
        .build();
    let token = app.user_token();

    let response = app
        .mutate(Method::DELETE, "/api/courses/user?id=2", Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .mutate(Method::DELETE, "/api/courses/user?id=1", Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "PSCourse with id 1 deleted"
    );
    assert_eq!(app.ps_courses.deleted(), vec![ps_course(1, 1, "08250", 1)]);
}
