use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::Exam;
use crate::repositories;
use crate::services::error::{ServiceError, ServiceResult, EXAM_NOT_FOUND};
use crate::services::lifecycle::{next_exam_state, ExamEvent};

/// Applies an activation event to an exam owned by this deployment.
pub(crate) async fn apply(pool: &PgPool, exam_id: &str, event: ExamEvent) -> ServiceResult<Exam> {
    let mut tx =
        pool.begin().await.map_err(|e| ServiceError::internal(e, "Failed to start transaction"))?;

    let exam = repositories::exams::lock_by_id(&mut *tx, exam_id)
        .await
        .map_err(|e| ServiceError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ServiceError::not_found(EXAM_NOT_FOUND))?;

    let next = next_exam_state(exam.state, event)?;
    let updated = repositories::exams::update_state(&mut *tx, exam_id, next, primitive_now_utc())
        .await
        .map_err(|e| ServiceError::internal(e, "Failed to update exam state"))?;

    tx.commit().await.map_err(|e| ServiceError::internal(e, "Failed to commit exam state"))?;

    tracing::info!(exam_id, from = ?exam.state, to = ?updated.state, "Exam state changed");
    Ok(updated)
}
