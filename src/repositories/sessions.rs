use sqlx::PgPool;

use crate::db::models::ExamSession;
use crate::db::types::SessionStatus;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, student_id, status, start_time, end_time, created_at, updated_at";

const LIVE_FILTER: &str = "status IN ('started', 'in_progress')";
const TERMINAL_FILTER: &str = "s.status IN ('finished', 'timeout')";

pub(crate) struct CreateSession<'a> {
    pub(crate) id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) start_time: time::PrimitiveDateTime,
}

/// Serializes session creation per student until the surrounding
/// transaction ends.
pub(crate) async fn acquire_student_lock(
    executor: impl sqlx::PgExecutor<'_>,
    student_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext('exam_session_student:' || $1))")
        .bind(student_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn find_live_by_student(
    executor: impl sqlx::PgExecutor<'_>,
    student_id: &str,
) -> Result<Option<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "SELECT {COLUMNS} FROM exam_sessions
         WHERE student_id = $1 AND {LIVE_FILTER}
         LIMIT 1"
    ))
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    session: CreateSession<'_>,
) -> Result<ExamSession, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "INSERT INTO exam_sessions (
            id, exam_id, student_id, status, start_time, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $5, $5)
        RETURNING {COLUMNS}"
    ))
    .bind(session.id)
    .bind(session.exam_id)
    .bind(session.student_id)
    .bind(SessionStatus::Started)
    .bind(session.start_time)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!("SELECT {COLUMNS} FROM exam_sessions WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn lock_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "SELECT {COLUMNS} FROM exam_sessions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update_status(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    status: SessionStatus,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE exam_sessions SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn close(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    status: SessionStatus,
    end_time: time::PrimitiveDateTime,
    now: time::PrimitiveDateTime,
) -> Result<ExamSession, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "UPDATE exam_sessions SET status = $1, end_time = $2, updated_at = $3
         WHERE id = $4
         RETURNING {COLUMNS}"
    ))
    .bind(status)
    .bind(end_time)
    .bind(now)
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Closes a session as timed out only if it is still live, so a concurrent
/// finish always wins. Returns whether a row changed.
pub(crate) async fn expire_if_live(
    pool: &PgPool,
    id: &str,
    deadline: time::PrimitiveDateTime,
    now: time::PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!(
        "UPDATE exam_sessions SET status = $1, end_time = $2, updated_at = $3
         WHERE id = $4 AND {LIVE_FILTER}"
    ))
    .bind(SessionStatus::Timeout)
    .bind(deadline)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Live sessions ordered by `(start_time, id)`, strictly after `after` when
/// given. Callers page with the last row until an empty page comes back.
pub(crate) async fn list_live_after(
    pool: &PgPool,
    after: Option<(time::PrimitiveDateTime, &str)>,
    limit: i64,
) -> Result<Vec<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "SELECT {COLUMNS} FROM exam_sessions
         WHERE {LIVE_FILTER}
           AND ($1::timestamp IS NULL OR (start_time, id) > ($1::timestamp, $2::varchar))
         ORDER BY start_time, id
         LIMIT $3"
    ))
    .bind(after.map(|(start_time, _)| start_time))
    .bind(after.map(|(_, id)| id))
    .bind(limit.clamp(1, 10_000))
    .fetch_all(pool)
    .await
}

/// Keyset position of a terminal session in the scoring sweep.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UnscoredSession {
    pub(crate) id: String,
    pub(crate) ended_at: time::PrimitiveDateTime,
}

/// Terminal sessions with no score for either the session itself or its
/// `(exam_id, student_id)` pair, ordered by `(ended_at, id)` and strictly
/// after `after` when given.
pub(crate) async fn list_unscored_after(
    pool: &PgPool,
    after: Option<&UnscoredSession>,
    limit: i64,
) -> Result<Vec<UnscoredSession>, sqlx::Error> {
    sqlx::query_as::<_, UnscoredSession>(&format!(
        "SELECT s.id, COALESCE(s.end_time, s.updated_at) AS ended_at
         FROM exam_sessions s
         WHERE {TERMINAL_FILTER}
           AND NOT EXISTS (
               SELECT 1 FROM exam_scores sc
               WHERE sc.session_id = s.id
                  OR (sc.exam_id = s.exam_id AND sc.student_id = s.student_id)
           )
           AND ($1::timestamp IS NULL
                OR (COALESCE(s.end_time, s.updated_at), s.id) > ($1::timestamp, $2::varchar))
         ORDER BY COALESCE(s.end_time, s.updated_at), s.id
         LIMIT $3"
    ))
    .bind(after.map(|cursor| cursor.ended_at))
    .bind(after.map(|cursor| cursor.id.as_str()))
    .bind(limit.clamp(1, 10_000))
    .fetch_all(pool)
    .await
}
