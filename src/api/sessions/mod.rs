mod handlers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::start_session))
        .route("/:session_id", get(handlers::get_session))
        .route("/:session_id/answers", post(handlers::submit_answer))
        .route("/:session_id/finish", post(handlers::finish_session))
        .route("/:session_id/remaining-time", get(handlers::remaining_time))
}
