use crate::db::models::SessionAnswer;

pub(crate) const COLUMNS: &str = "session_id, question_id, selected_choice, answered_at";

/// One row per (session, question); a resubmission overwrites the choice.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    session_id: &str,
    question_id: &str,
    selected_choice: &str,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO session_answers (session_id, question_id, selected_choice, answered_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (session_id, question_id)
         DO UPDATE SET selected_choice = EXCLUDED.selected_choice,
                       answered_at = EXCLUDED.answered_at",
    )
    .bind(session_id)
    .bind(question_id)
    .bind(selected_choice)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_session(
    executor: impl sqlx::PgExecutor<'_>,
    session_id: &str,
) -> Result<Vec<SessionAnswer>, sqlx::Error> {
    sqlx::query_as::<_, SessionAnswer>(&format!(
        "SELECT {COLUMNS} FROM session_answers WHERE session_id = $1 ORDER BY question_id"
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await
}
