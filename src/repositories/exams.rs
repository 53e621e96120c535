use sqlx::PgPool;

use crate::db::models::Exam;
use crate::db::types::ExamState;

pub(crate) const COLUMNS: &str = "\
    id, title, subject, duration_minutes, total_questions, teacher_id, state, \
    start_time, end_time, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn lock_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1 FOR UPDATE"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Activation stamps `start_time`; deactivation stamps `end_time`.
pub(crate) async fn update_state(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    state: ExamState,
    now: time::PrimitiveDateTime,
) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams SET state = $1,
            start_time = CASE WHEN $1 = 'active'::examstate THEN $2 ELSE start_time END,
            end_time = CASE WHEN $1 = 'finished'::examstate THEN $2 ELSE end_time END,
            updated_at = $2
         WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(state)
    .bind(now)
    .bind(id)
    .fetch_one(executor)
    .await
}
