mod handlers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::calculate_score))
        .route("/:score_id", get(handlers::get_score))
}

/// Per-exam score reads, mounted under `/exams`.
pub(crate) fn exam_router() -> Router<AppState> {
    Router::new()
        .route("/:exam_id/scores", get(handlers::list_exam_scores))
        .route("/:exam_id/students/:student_id/score", get(handlers::get_student_score))
}

#[cfg(test)]
mod tests;
