use sqlx::PgPool;

use crate::db::models::ExamScore;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, session_id, student_id, total_questions, correct_answers, \
    wrong_answers, unanswered, score, created_at";

pub(crate) struct CreateScore<'a> {
    pub(crate) id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) session_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) unanswered: i32,
    pub(crate) score: f64,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, score: CreateScore<'_>) -> Result<ExamScore, sqlx::Error> {
    sqlx::query_as::<_, ExamScore>(&format!(
        "INSERT INTO exam_scores (
            id, exam_id, session_id, student_id, total_questions,
            correct_answers, wrong_answers, unanswered, score, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
        RETURNING {COLUMNS}"
    ))
    .bind(score.id)
    .bind(score.exam_id)
    .bind(score.session_id)
    .bind(score.student_id)
    .bind(score.total_questions)
    .bind(score.correct_answers)
    .bind(score.wrong_answers)
    .bind(score.unanswered)
    .bind(score.score)
    .bind(score.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ExamScore>, sqlx::Error> {
    sqlx::query_as::<_, ExamScore>(&format!("SELECT {COLUMNS} FROM exam_scores WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_exam_and_student(
    pool: &PgPool,
    exam_id: &str,
    student_id: &str,
) -> Result<Option<ExamScore>, sqlx::Error> {
    sqlx::query_as::<_, ExamScore>(&format!(
        "SELECT {COLUMNS} FROM exam_scores WHERE exam_id = $1 AND student_id = $2"
    ))
    .bind(exam_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_exam(
    pool: &PgPool,
    exam_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<ExamScore>, sqlx::Error> {
    sqlx::query_as::<_, ExamScore>(&format!(
        "SELECT {COLUMNS} FROM exam_scores
         WHERE exam_id = $1
         ORDER BY score DESC, created_at
         OFFSET $2 LIMIT $3"
    ))
    .bind(exam_id)
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_exam(pool: &PgPool, exam_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exam_scores WHERE exam_id = $1")
        .bind(exam_id)
        .fetch_one(pool)
        .await
}
