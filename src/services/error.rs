use thiserror::Error;

pub(crate) const EXAM_NOT_FOUND: &str = "exam not found";
pub(crate) const EXAM_NOT_ACTIVE: &str = "exam is not active";
pub(crate) const EXAM_NOT_ACTIVATABLE: &str = "exam can only be activated when in created state";
pub(crate) const EXAM_NOT_DEACTIVATABLE: &str = "exam can only be deactivated when in active state";
pub(crate) const STUDENT_HAS_LIVE_SESSION: &str = "student already has an active session";
pub(crate) const SESSION_NOT_FOUND: &str = "session not found";
pub(crate) const SESSION_NOT_ANSWERABLE: &str = "session is not in valid state for answering";
pub(crate) const SESSION_ALREADY_FINISHED: &str = "session is already finished";
pub(crate) const SESSION_TIMED_OUT: &str = "session has timed out";
pub(crate) const SESSION_NOT_FINISHED: &str = "session is not finished";
pub(crate) const SCORE_NOT_FOUND: &str = "score not found";
pub(crate) const SCORE_ALREADY_EXISTS: &str = "score already exists for this exam and student";
pub(crate) const NO_ANSWER_KEY: &str = "no answer key for exam";

/// Failure taxonomy shared by the exam authority, session manager and
/// scoring aggregator. Raw storage errors never leave a service; they are
/// logged and folded into `Internal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    FailedPrecondition(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub(crate) fn failed_precondition(message: &str) -> Self {
        Self::FailedPrecondition(message.to_string())
    }

    pub(crate) fn already_exists(message: &str) -> Self {
        Self::AlreadyExists(message.to_string())
    }

    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

pub(crate) type ServiceResult<T> = Result<T, ServiceError>;
