use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{ExamState, SessionStatus};
use crate::test_support;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(test_support::json_request(method, uri, body))
        .await
        .expect("request");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

async fn finished_session(app: &Router, exam_id: &str, student_id: &str, answers: &[(&str, &str)]) -> String {
    let (status, session) = send(
        app,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({ "exam_id": exam_id, "student_id": student_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {session}");
    let session_id = session["id"].as_str().expect("session id").to_string();

    for (question_id, choice) in answers {
        let (status, body) = send(
            app,
            Method::POST,
            &format!("/api/v1/sessions/{session_id}/answers"),
            Some(json!({ "question_id": question_id, "selected_choice": choice })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
    }

    let (status, body) =
        send(app, Method::POST, &format!("/api/v1/sessions/{session_id}/finish"), None).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    session_id
}

#[tokio::test]
async fn finished_session_is_scored_exactly_once() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_exam(
        ctx.state.db(),
        "exam-1",
        ExamState::Active,
        60,
        &["A", "B", "C", "D", "A"],
    )
    .await;

    let session_id =
        finished_session(&ctx.app, "exam-1", "student-1", &[("q1", "A"), ("q2", "C"), ("q5", "B")])
            .await;

    let (status, score) =
        send(&ctx.app, Method::POST, "/api/v1/scores", Some(json!({ "session_id": session_id })))
            .await;
    assert_eq!(status, StatusCode::CREATED, "response: {score}");
    assert_eq!(score["total_questions"], 5);
    assert_eq!(score["correct_answers"], 1);
    assert_eq!(score["wrong_answers"], 2);
    assert_eq!(score["unanswered"], 2);
    assert!((score["score"].as_f64().expect("score") - 20.0).abs() < 1e-9);
    let score_id = score["id"].as_str().expect("score id").to_string();

    let (status, body) =
        send(&ctx.app, Method::POST, "/api/v1/scores", Some(json!({ "session_id": session_id })))
            .await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["code"], "already_exists");

    let (status, body) =
        send(&ctx.app, Method::GET, &format!("/api/v1/scores/{score_id}"), None).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["session_id"], session_id);

    let (status, body) =
        send(&ctx.app, Method::GET, "/api/v1/exams/exam-1/students/student-1/score", None).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["id"], score_id);
}

#[tokio::test]
async fn exam_scores_are_listed_best_first() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_exam(ctx.state.db(), "exam-1", ExamState::Active, 60, &["A", "B"]).await;

    for (student_id, answers) in [
        ("student-1", vec![("q1", "A")]),
        ("student-2", vec![("q1", "A"), ("q2", "B")]),
        ("student-3", vec![]),
    ] {
        let session_id = finished_session(&ctx.app, "exam-1", student_id, &answers).await;
        let (status, body) = send(
            &ctx.app,
            Method::POST,
            "/api/v1/scores",
            Some(json!({ "session_id": session_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
    }

    let (status, body) =
        send(&ctx.app, Method::GET, "/api/v1/exams/exam-1/scores?skip=0&limit=2", None).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["total_count"], 3);
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["student_id"], "student-2");
    assert_eq!(items[1]["student_id"], "student-1");

    for item in items {
        let total = item["total_questions"].as_i64().expect("total");
        let parts = item["correct_answers"].as_i64().expect("correct")
            + item["wrong_answers"].as_i64().expect("wrong")
            + item["unanswered"].as_i64().expect("unanswered");
        assert_eq!(parts, total);
    }
}

#[tokio::test]
async fn live_session_cannot_be_scored() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_exam(ctx.state.db(), "exam-1", ExamState::Active, 60, &["A"]).await;
    test_support::insert_session(
        ctx.state.db(),
        "session-live",
        "exam-1",
        "student-1",
        SessionStatus::InProgress,
        5,
    )
    .await;

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/scores",
        Some(json!({ "session_id": "session-live" })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED, "response: {body}");
    assert_eq!(body["detail"], "session is not finished");
}

#[tokio::test]
async fn timed_out_session_is_scored_like_a_finished_one() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_exam(ctx.state.db(), "exam-1", ExamState::Active, 30, &["A", "B"]).await;
    test_support::insert_session(
        ctx.state.db(),
        "session-late",
        "exam-1",
        "student-1",
        SessionStatus::Timeout,
        40,
    )
    .await;

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/scores",
        Some(json!({ "session_id": "session-late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["unanswered"], 2);
    assert_eq!(body["score"], 0.0);
}

#[tokio::test]
async fn missing_session_or_answer_key_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) =
        send(&ctx.app, Method::POST, "/api/v1/scores", Some(json!({ "session_id": "missing" })))
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], "session not found");

    test_support::insert_exam(ctx.state.db(), "exam-empty", ExamState::Active, 60, &[]).await;
    let session_id = finished_session(&ctx.app, "exam-empty", "student-1", &[]).await;

    let (status, body) =
        send(&ctx.app, Method::POST, "/api/v1/scores", Some(json!({ "session_id": session_id })))
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], "no answer key for exam");

    let (status, _) = send(&ctx.app, Method::GET, "/api/v1/scores/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
