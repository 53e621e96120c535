mod handlers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:exam_id/state", get(handlers::get_exam_state))
        .route("/:exam_id/activate", post(handlers::activate_exam))
        .route("/:exam_id/deactivate", post(handlers::deactivate_exam))
}

#[cfg(test)]
mod tests;
