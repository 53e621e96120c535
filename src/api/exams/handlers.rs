use axum::extract::{Path, State};
use axum::Json;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::exam::ExamResponse;
use crate::services::error::EXAM_NOT_FOUND;
use crate::services::exam_activation;
use crate::services::exam_authority::ExamSnapshot;
use crate::services::lifecycle::ExamEvent;

/// Authority endpoint read by remote session managers. Always served from
/// this deployment's own `exams` table.
pub(in crate::api::exams) async fn get_exam_state(
    Path(exam_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExamSnapshot>, ApiError> {
    let exam = repositories::exams::find_by_id(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound(EXAM_NOT_FOUND.to_string()))?;

    Ok(Json(ExamSnapshot::from(exam)))
}

pub(in crate::api::exams) async fn activate_exam(
    Path(exam_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = exam_activation::apply(state.db(), &exam_id, ExamEvent::Activate).await?;
    Ok(Json(ExamResponse::from(exam)))
}

pub(in crate::api::exams) async fn deactivate_exam(
    Path(exam_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = exam_activation::apply(state.db(), &exam_id, ExamEvent::Deactivate).await?;
    Ok(Json(ExamResponse::from(exam)))
}
