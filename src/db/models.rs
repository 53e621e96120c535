use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{ExamState, SessionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject: Option<String>,
    pub(crate) duration_minutes: i32,
    pub(crate) total_questions: i32,
    pub(crate) teacher_id: String,
    pub(crate) state: ExamState,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamSession {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: SessionStatus,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct SessionAnswer {
    pub(crate) session_id: String,
    pub(crate) question_id: String,
    pub(crate) selected_choice: String,
    pub(crate) answered_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamScore {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) session_id: String,
    pub(crate) student_id: String,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) unanswered: i32,
    pub(crate) score: f64,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One row of an exam's answer key.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct AnswerKeyEntry {
    pub(crate) question_id: String,
    pub(crate) correct_answer: String,
}
