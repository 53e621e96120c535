use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Exam;
use crate::db::types::ExamState;

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject: Option<String>,
    pub(crate) duration_minutes: i32,
    pub(crate) total_questions: i32,
    pub(crate) state: ExamState,
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
    pub(crate) updated_at: String,
}

impl From<Exam> for ExamResponse {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id,
            title: exam.title,
            subject: exam.subject,
            duration_minutes: exam.duration_minutes,
            total_questions: exam.total_questions,
            state: exam.state,
            start_time: exam.start_time.map(format_primitive),
            end_time: exam.end_time.map(format_primitive),
            updated_at: format_primitive(exam.updated_at),
        }
    }
}
