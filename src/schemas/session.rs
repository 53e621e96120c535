use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{ExamSession, SessionAnswer};
use crate::db::types::SessionStatus;
use crate::services::session_manager::SessionWithAnswers;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StartSessionRequest {
    #[serde(alias = "examId")]
    #[validate(length(min = 1, max = 64, message = "exam_id must be 1-64 characters"))]
    pub(crate) exam_id: String,
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, max = 64, message = "student_id must be 1-64 characters"))]
    pub(crate) student_id: String,
}

/// An empty `selected_choice` clears a previous answer.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmitAnswerRequest {
    #[serde(alias = "questionId")]
    #[validate(length(min = 1, max = 64, message = "question_id must be 1-64 characters"))]
    pub(crate) question_id: String,
    #[serde(default, alias = "selectedChoice")]
    #[validate(length(max = 8, message = "selected_choice must be at most 8 characters"))]
    pub(crate) selected_choice: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerResponse {
    pub(crate) question_id: String,
    pub(crate) selected_choice: String,
    pub(crate) answered_at: String,
}

impl From<SessionAnswer> for AnswerResponse {
    fn from(answer: SessionAnswer) -> Self {
        Self {
            question_id: answer.question_id,
            selected_choice: answer.selected_choice,
            answered_at: format_primitive(answer.answered_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: SessionStatus,
    pub(crate) start_time: String,
    pub(crate) end_time: Option<String>,
    pub(crate) answers: Vec<AnswerResponse>,
}

impl SessionResponse {
    pub(crate) fn from_parts(session: ExamSession, answers: Vec<SessionAnswer>) -> Self {
        Self {
            id: session.id,
            exam_id: session.exam_id,
            student_id: session.student_id,
            status: session.status,
            start_time: format_primitive(session.start_time),
            end_time: session.end_time.map(format_primitive),
            answers: answers.into_iter().map(AnswerResponse::from).collect(),
        }
    }
}

impl From<ExamSession> for SessionResponse {
    fn from(session: ExamSession) -> Self {
        Self::from_parts(session, Vec::new())
    }
}

impl From<SessionWithAnswers> for SessionResponse {
    fn from(value: SessionWithAnswers) -> Self {
        Self::from_parts(value.session, value.answers)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitAnswerResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) answer: AnswerResponse,
}
