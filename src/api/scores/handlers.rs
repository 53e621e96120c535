use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::schemas::score::{CalculateScoreRequest, ExamScoreResponse, ListScoresQuery};

pub(in crate::api::scores) async fn calculate_score(
    State(state): State<AppState>,
    Json(payload): Json<CalculateScoreRequest>,
) -> Result<(StatusCode, Json<ExamScoreResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let score = state.scoring().calculate_score(&payload.session_id).await?;

    Ok((StatusCode::CREATED, Json(ExamScoreResponse::from(score))))
}

pub(in crate::api::scores) async fn get_score(
    Path(score_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExamScoreResponse>, ApiError> {
    let score = state.scoring().get_score(&score_id).await?;
    Ok(Json(ExamScoreResponse::from(score)))
}

pub(in crate::api::scores) async fn get_student_score(
    Path((exam_id, student_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<ExamScoreResponse>, ApiError> {
    let score = state.scoring().score_for_student(&exam_id, &student_id).await?;
    Ok(Json(ExamScoreResponse::from(score)))
}

pub(in crate::api::scores) async fn list_exam_scores(
    Path(exam_id): Path<String>,
    Query(params): Query<ListScoresQuery>,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<ExamScoreResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let (items, total_count) = state.scoring().list_scores(&exam_id, skip, limit).await?;

    Ok(Json(PaginatedResponse {
        items: items.into_iter().map(ExamScoreResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}
