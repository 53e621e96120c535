use sqlx::PgPool;

use crate::db::models::AnswerKeyEntry;

pub(crate) async fn list_answer_key(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<AnswerKeyEntry>, sqlx::Error> {
    sqlx::query_as::<_, AnswerKeyEntry>(
        "SELECT id AS question_id, correct_answer
         FROM questions
         WHERE exam_id = $1
         ORDER BY order_index, id",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}
