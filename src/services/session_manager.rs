use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::metrics::{ANSWERS_SUBMITTED, SESSIONS_FINISHED, SESSIONS_STARTED, SESSIONS_TIMED_OUT};
use crate::core::time::{plus_minutes, primitive_now_utc};
use crate::db::models::{ExamSession, SessionAnswer};
use crate::db::{unique_violation, LIVE_SESSION_INDEX};
use crate::repositories;
use crate::repositories::sessions::CreateSession;
use crate::services::error::{
    ServiceError, ServiceResult, EXAM_NOT_ACTIVE, SESSION_NOT_FINISHED, SESSION_NOT_FOUND,
    STUDENT_HAS_LIVE_SESSION,
};
use crate::services::exam_authority::ExamAuthority;
use crate::services::exam_duration::ExamDurationSource;
use crate::services::lifecycle::{next_session_status, SessionEvent};
use crate::services::remaining_time::{remaining_time, RemainingTime};

#[derive(Debug, Clone)]
pub(crate) struct SessionWithAnswers {
    pub(crate) session: ExamSession,
    pub(crate) answers: Vec<SessionAnswer>,
}

/// Answers of a terminal session, keyed by question id.
#[derive(Debug, Clone)]
pub(crate) struct FinalizedLedger {
    pub(crate) session: ExamSession,
    pub(crate) answers: HashMap<String, String>,
}

/// Owns the lifecycle of exam sessions and their answer ledgers.
#[derive(Clone)]
pub(crate) struct SessionManager {
    pool: PgPool,
    authority: Arc<dyn ExamAuthority>,
    durations: ExamDurationSource,
}

impl SessionManager {
    pub(crate) fn new(
        pool: PgPool,
        authority: Arc<dyn ExamAuthority>,
        durations: ExamDurationSource,
    ) -> Self {
        Self { pool, authority, durations }
    }

    /// Opens a session for a student on an active exam. At most one live
    /// session exists per student: creation runs under a per-student
    /// advisory lock and the partial unique index backs it up.
    pub(crate) async fn start_session(
        &self,
        exam_id: &str,
        student_id: &str,
    ) -> ServiceResult<ExamSession> {
        if !self.authority.is_exam_active(exam_id).await? {
            return Err(ServiceError::failed_precondition(EXAM_NOT_ACTIVE));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to start transaction"))?;

        repositories::sessions::acquire_student_lock(&mut *tx, student_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to lock student sessions"))?;

        let live = repositories::sessions::find_live_by_student(&mut *tx, student_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to check live sessions"))?;
        if live.is_some() {
            return Err(ServiceError::failed_precondition(STUDENT_HAS_LIVE_SESSION));
        }

        let session_id = Uuid::new_v4().to_string();
        let session = repositories::sessions::create(
            &mut *tx,
            CreateSession {
                id: &session_id,
                exam_id,
                student_id,
                start_time: primitive_now_utc(),
            },
        )
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(constraint) if constraint == LIVE_SESSION_INDEX => {
                ServiceError::failed_precondition(STUDENT_HAS_LIVE_SESSION)
            }
            _ => ServiceError::internal(e, "Failed to create session"),
        })?;

        tx.commit().await.map_err(|e| ServiceError::internal(e, "Failed to commit session"))?;

        metrics::counter!(SESSIONS_STARTED).increment(1);
        tracing::info!(session_id = %session.id, exam_id, student_id, "Exam session started");

        Ok(session)
    }

    pub(crate) async fn get_session(&self, session_id: &str) -> ServiceResult<SessionWithAnswers> {
        let session = self.fetch_session(session_id).await?;
        let answers = repositories::answers::list_by_session(&self.pool, session_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch answers"))?;

        Ok(SessionWithAnswers { session, answers })
    }

    /// Records or overwrites one answer. The session row is locked for the
    /// duration so the status check and the write cannot interleave with a
    /// finish or timeout.
    pub(crate) async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        selected_choice: &str,
    ) -> ServiceResult<SessionAnswer> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to start transaction"))?;

        let session = repositories::sessions::lock_by_id(&mut *tx, session_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch session"))?
            .ok_or_else(|| ServiceError::not_found(SESSION_NOT_FOUND))?;

        let next = next_session_status(session.status, SessionEvent::Answer)?;
        let now = primitive_now_utc();

        repositories::answers::upsert(&mut *tx, session_id, question_id, selected_choice, now)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to save answer"))?;

        if next != session.status {
            repositories::sessions::update_status(&mut *tx, session_id, next, now)
                .await
                .map_err(|e| ServiceError::internal(e, "Failed to update session status"))?;
        }

        tx.commit().await.map_err(|e| ServiceError::internal(e, "Failed to commit answer"))?;

        metrics::counter!(ANSWERS_SUBMITTED).increment(1);
        tracing::debug!(session_id, question_id, "Answer recorded");

        Ok(SessionAnswer {
            session_id: session_id.to_string(),
            question_id: question_id.to_string(),
            selected_choice: selected_choice.to_string(),
            answered_at: now,
        })
    }

    /// Closes a live session at the current time. The exam's activation
    /// state is not consulted.
    pub(crate) async fn finish_session(&self, session_id: &str) -> ServiceResult<SessionWithAnswers> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to start transaction"))?;

        let session = repositories::sessions::lock_by_id(&mut *tx, session_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch session"))?
            .ok_or_else(|| ServiceError::not_found(SESSION_NOT_FOUND))?;

        let next = next_session_status(session.status, SessionEvent::Finish)?;
        let now = primitive_now_utc();

        let session = repositories::sessions::close(&mut *tx, session_id, next, now, now)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to finish session"))?;
        let answers = repositories::answers::list_by_session(&mut *tx, session_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch answers"))?;

        tx.commit().await.map_err(|e| ServiceError::internal(e, "Failed to commit finish"))?;

        metrics::counter!(SESSIONS_FINISHED).increment(1);
        tracing::info!(session_id, answers = answers.len(), "Exam session finished");

        Ok(SessionWithAnswers { session, answers })
    }

    pub(crate) async fn remaining_time(&self, session_id: &str) -> ServiceResult<RemainingTime> {
        let session = self.fetch_session(session_id).await?;
        if session.status.is_terminal() {
            return Ok(RemainingTime::ZERO);
        }

        let duration = self.durations.duration_minutes(&session.exam_id).await?;
        Ok(remaining_time(session.status, session.start_time, duration, primitive_now_utc()))
    }

    /// The answer ledger of a terminal session. Live sessions are refused so
    /// a score never sees answers that can still change.
    pub(crate) async fn finalized_ledger(&self, session_id: &str) -> ServiceResult<FinalizedLedger> {
        let SessionWithAnswers { session, answers } = self.get_session(session_id).await?;
        if session.status.is_live() {
            return Err(ServiceError::failed_precondition(SESSION_NOT_FINISHED));
        }

        let answers = answers
            .into_iter()
            .map(|answer| (answer.question_id, answer.selected_choice))
            .collect();

        Ok(FinalizedLedger { session, answers })
    }

    /// Moves every live session whose deadline has passed to `Timeout`,
    /// stamping the deadline as its end time. All live sessions are visited
    /// in pages of `batch`. Returns how many were closed.
    pub(crate) async fn close_overdue_sessions(
        &self,
        now: time::PrimitiveDateTime,
        batch: i64,
    ) -> ServiceResult<usize> {
        let mut durations: HashMap<String, i32> = HashMap::new();
        let mut cursor: Option<(time::PrimitiveDateTime, String)> = None;
        let mut closed = 0;

        loop {
            let after = cursor.as_ref().map(|(start_time, id)| (*start_time, id.as_str()));
            let live = repositories::sessions::list_live_after(&self.pool, after, batch)
                .await
                .map_err(|e| ServiceError::internal(e, "Failed to list live sessions"))?;
            let Some(last) = live.last() else {
                break;
            };
            cursor = Some((last.start_time, last.id.clone()));

            for session in live {
                let duration = match durations.get(&session.exam_id) {
                    Some(duration) => *duration,
                    None => match self.durations.duration_minutes(&session.exam_id).await {
                        Ok(duration) => {
                            durations.insert(session.exam_id.clone(), duration);
                            duration
                        }
                        Err(err) => {
                            tracing::warn!(
                                session_id = %session.id,
                                exam_id = %session.exam_id,
                                error = %err,
                                "Skipping timeout check, exam duration unavailable"
                            );
                            continue;
                        }
                    },
                };

                let deadline = plus_minutes(session.start_time, duration);
                if deadline > now {
                    continue;
                }

                next_session_status(session.status, SessionEvent::Timeout)?;
                let changed =
                    repositories::sessions::expire_if_live(&self.pool, &session.id, deadline, now)
                        .await
                        .map_err(|e| ServiceError::internal(e, "Failed to time out session"))?;

                if changed {
                    closed += 1;
                    metrics::counter!(SESSIONS_TIMED_OUT).increment(1);
                    tracing::info!(session_id = %session.id, exam_id = %session.exam_id, "Exam session timed out");
                }
            }
        }

        Ok(closed)
    }

    async fn fetch_session(&self, session_id: &str) -> ServiceResult<ExamSession> {
        repositories::sessions::find_by_id(&self.pool, session_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch session"))?
            .ok_or_else(|| ServiceError::not_found(SESSION_NOT_FOUND))
    }
}
