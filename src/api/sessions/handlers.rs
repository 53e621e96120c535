use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::session::{
    AnswerResponse, SessionResponse, StartSessionRequest, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
use crate::services::remaining_time::RemainingTime;

pub(in crate::api::sessions) async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = state.sessions().start_session(&payload.exam_id, &payload.student_id).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

pub(in crate::api::sessions) async fn get_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions().get_session(&session_id).await?;
    Ok(Json(SessionResponse::from(session)))
}

pub(in crate::api::sessions) async fn submit_answer(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let answer = state
        .sessions()
        .submit_answer(&session_id, &payload.question_id, &payload.selected_choice)
        .await?;

    Ok(Json(SubmitAnswerResponse {
        success: true,
        message: "answer submitted".to_string(),
        answer: AnswerResponse::from(answer),
    }))
}

pub(in crate::api::sessions) async fn finish_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions().finish_session(&session_id).await?;
    Ok(Json(SessionResponse::from(session)))
}

pub(in crate::api::sessions) async fn remaining_time(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RemainingTime>, ApiError> {
    let remaining = state.sessions().remaining_time(&session_id).await?;
    Ok(Json(remaining))
}
