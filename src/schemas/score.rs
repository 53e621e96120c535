use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::ExamScore;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CalculateScoreRequest {
    #[serde(alias = "sessionId")]
    #[validate(length(min = 1, max = 64, message = "session_id must be 1-64 characters"))]
    pub(crate) session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListScoresQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamScoreResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) session_id: String,
    pub(crate) student_id: String,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) unanswered: i32,
    pub(crate) score: f64,
    pub(crate) created_at: String,
}

impl From<ExamScore> for ExamScoreResponse {
    fn from(score: ExamScore) -> Self {
        Self {
            id: score.id,
            exam_id: score.exam_id,
            session_id: score.session_id,
            student_id: score.student_id,
            total_questions: score.total_questions,
            correct_answers: score.correct_answers,
            wrong_answers: score.wrong_answers,
            unanswered: score.unanswered,
            score: score.score,
            created_at: format_primitive(score.created_at),
        }
    }
}
