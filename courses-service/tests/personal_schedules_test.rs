mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, schedule, TestApp};
use serde_json::json;

#[tokio::test]
async fn schedules_require_authentication() {
    let app = TestApp::spawn();

    let response = app.get("/api/personalschedules/all", None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_lists_own_schedules_and_admin_lists_all() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .with_schedule(schedule(2, 2, "20222"))
        .build();

    let own = body_json(
        app.get("/api/personalschedules/all", Some(&app.user_token()))
            .await,
    )
    .await;
    assert_eq!(own.as_array().map(Vec::len), Some(1));
    assert_eq!(own[0]["quarter"], "20221");

    let response = app
        .get("/api/personalschedules/admin/all", Some(&app.user_token()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let all = body_json(
        app.get("/api/personalschedules/admin/all", Some(&app.admin_token()))
            .await,
    )
    .await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn user_creates_schedule() {
    let app = TestApp::spawn();
    let token = app.user_token();

    let response = app
        .mutate(
            Method::POST,
            "/api/personalschedules/post?name=CS156&description=Winter%20plan&quarter=20221",
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "userId": 1, "name": "CS156", "description": "Winter plan", "quarter": "20221" })
    );
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let app = TestApp::spawn();
    let token = app.user_token();

    for uri in [
        "/api/personalschedules/post?name=&description=d&quarter=20221",
        "/api/personalschedules/post?name=ThisNameIsWayTooLong&description=d&quarter=20221",
        "/api/personalschedules/post?name=CS156&description=d&quarter=20225",
    ] {
        let response = app.mutate(Method::POST, uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }

    let listed = body_json(app.get("/api/personalschedules/all", Some(&token)).await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn get_another_users_schedule_returns_404() {
    let app = TestApp::builder()
        .with_schedule(schedule(2, 2, "20222"))
        .build();

    let response = app
        .get("/api/personalschedules?id=2", Some(&app.user_token()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "PersonalSchedule with id 2 not found"
    );
}

#[tokio::test]
async fn user_updates_own_schedule() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .build();

    let response = app
        .mutate_json(
            Method::PUT,
            "/api/personalschedules?id=1",
            Some(&app.user_token()),
            json!({ "name": "Spring", "description": "moved", "quarter": "20222" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "userId": 1, "name": "Spring", "description": "moved", "quarter": "20222" })
    );
}

#[tokio::test]
async fn user_deletes_own_schedule() {
    let app = TestApp::builder()
        .with_schedule(schedule(1, 1, "20221"))
        .build();

    let response = app
        .mutate(
            Method::DELETE,
            "/api/personalschedules?id=1",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "PersonalSchedule with id 1 deleted"
    );
    assert_eq!(app.schedules.deleted(), vec![schedule(1, 1, "20221")]);
}

#[tokio::test]
async fn delete_another_users_schedule_returns_404() {
    let app = TestApp::builder()
        .with_schedule(schedule(2, 2, "20222"))
        .build();

    let response = app
        .mutate(
            Method::DELETE,
            "/api/personalschedules?id=2",
            Some(&app.user_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.schedules.deleted().is_empty());
}
