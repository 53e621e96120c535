use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::metrics::SCORES_CREATED;
use crate::core::time::primitive_now_utc;
use crate::db::models::ExamScore;
use crate::db::{unique_violation, SCORE_EXAM_STUDENT_KEY, SCORE_SESSION_KEY};
use crate::repositories;
use crate::repositories::scores::CreateScore;
use crate::repositories::sessions::UnscoredSession;
use crate::services::answer_keys::AnswerKeySource;
use crate::services::error::{
    ServiceError, ServiceResult, NO_ANSWER_KEY, SCORE_ALREADY_EXISTS, SCORE_NOT_FOUND,
};
use crate::services::session_manager::SessionManager;
use crate::services::tally::tally;

#[derive(Clone)]
pub(crate) struct ScoringAggregator {
    pool: PgPool,
    sessions: SessionManager,
    answer_keys: Arc<dyn AnswerKeySource>,
}

impl ScoringAggregator {
    pub(crate) fn new(
        pool: PgPool,
        sessions: SessionManager,
        answer_keys: Arc<dyn AnswerKeySource>,
    ) -> Self {
        Self { pool, sessions, answer_keys }
    }

    /// Scores a terminal session exactly once per (exam, student).
    pub(crate) async fn calculate_score(&self, session_id: &str) -> ServiceResult<ExamScore> {
        let ledger = self.sessions.finalized_ledger(session_id).await?;
        let exam_id = ledger.session.exam_id.as_str();
        let student_id = ledger.session.student_id.as_str();

        let key = self.answer_keys.answer_key(exam_id).await?;
        if key.is_empty() {
            return Err(ServiceError::not_found(NO_ANSWER_KEY));
        }

        let result = tally(&key, &ledger.answers);
        let score_id = Uuid::new_v4().to_string();

        let score = repositories::scores::create(
            &self.pool,
            CreateScore {
                id: &score_id,
                exam_id,
                session_id,
                student_id,
                total_questions: result.total_questions,
                correct_answers: result.correct_answers,
                wrong_answers: result.wrong_answers,
                unanswered: result.unanswered,
                score: result.score(),
                created_at: primitive_now_utc(),
            },
        )
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some(SCORE_EXAM_STUDENT_KEY | SCORE_SESSION_KEY) => {
                ServiceError::already_exists(SCORE_ALREADY_EXISTS)
            }
            _ => ServiceError::internal(e, "Failed to save score"),
        })?;

        metrics::counter!(SCORES_CREATED).increment(1);
        tracing::info!(
            session_id,
            exam_id,
            student_id,
            score = score.score,
            correct = score.correct_answers,
            total = score.total_questions,
            "Exam score recorded"
        );

        Ok(score)
    }

    pub(crate) async fn get_score(&self, score_id: &str) -> ServiceResult<ExamScore> {
        repositories::scores::find_by_id(&self.pool, score_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch score"))?
            .ok_or_else(|| ServiceError::not_found(SCORE_NOT_FOUND))
    }

    pub(crate) async fn score_for_student(
        &self,
        exam_id: &str,
        student_id: &str,
    ) -> ServiceResult<ExamScore> {
        repositories::scores::find_by_exam_and_student(&self.pool, exam_id, student_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch score"))?
            .ok_or_else(|| ServiceError::not_found(SCORE_NOT_FOUND))
    }

    /// Scores for an exam, best first, with the total count for paging.
    pub(crate) async fn list_scores(
        &self,
        exam_id: &str,
        skip: i64,
        limit: i64,
    ) -> ServiceResult<(Vec<ExamScore>, i64)> {
        let items = repositories::scores::list_by_exam(&self.pool, exam_id, skip, limit)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to list scores"))?;
        let total = repositories::scores::count_by_exam(&self.pool, exam_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to count scores"))?;

        Ok((items, total))
    }

    /// Scores terminal sessions that have none yet, walking every candidate
    /// once per call in pages of `batch`. Sessions that cannot be scored
    /// (no answer key, student already scored on the exam) are skipped and
    /// never hold back the ones behind them. A concurrent scorer winning the
    /// race is not an error.
    pub(crate) async fn score_pending_sessions(&self, batch: i64) -> ServiceResult<usize> {
        let mut cursor: Option<UnscoredSession> = None;
        let mut scored = 0;

        loop {
            let page = repositories::sessions::list_unscored_after(&self.pool, cursor.as_ref(), batch)
                .await
                .map_err(|e| ServiceError::internal(e, "Failed to list unscored sessions"))?;
            let Some(last) = page.last().cloned() else {
                break;
            };

            for pending in &page {
                let session_id = &pending.id;
                match self.calculate_score(session_id).await {
                    Ok(_) => scored += 1,
                    Err(ServiceError::AlreadyExists(_)) => {
                        tracing::debug!(session_id = %session_id, "Session already scored");
                    }
                    Err(ServiceError::NotFound(message)) => {
                        tracing::warn!(session_id = %session_id, reason = %message, "Session cannot be scored yet");
                    }
                    Err(err) => {
                        tracing::error!(session_id = %session_id, error = %err, "Automatic scoring failed");
                    }
                }
            }

            cursor = Some(last);
        }

        Ok(scored)
    }
}
