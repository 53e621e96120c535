use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::db::types::ExamState;
use crate::test_support;

#[tokio::test]
async fn exam_moves_from_created_to_active_to_finished() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_exam(ctx.state.db(), "exam-1", ExamState::Created, 60, &["A"]).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/exams/exam-1/state", None))
        .await
        .expect("state");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["state"], "created");
    assert_eq!(body["duration_minutes"], 60);
    assert!(body["start_time"].is_null());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/v1/exams/exam-1/activate", None))
        .await
        .expect("activate");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["state"], "active");
    assert!(body["start_time"].is_string());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/v1/exams/exam-1/activate", None))
        .await
        .expect("activate again");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED, "response: {body}");
    assert_eq!(body["code"], "failed_precondition");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/v1/exams/exam-1/deactivate", None))
        .await
        .expect("deactivate");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["state"], "finished");
    assert!(body["end_time"].is_string());

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::POST, "/api/v1/exams/exam-1/deactivate", None))
        .await
        .expect("deactivate again");
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn unknown_exam_state_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/exams/missing/state", None))
        .await
        .expect("state");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], "exam not found");

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::POST, "/api/v1/exams/missing/activate", None))
        .await
        .expect("activate");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
