//! Every legal status change for sessions and exams. Call sites ask this
//! module for the next status and never compare statuses themselves.

use crate::db::types::{ExamState, SessionStatus};
use crate::services::error::{
    ServiceError, EXAM_NOT_ACTIVATABLE, EXAM_NOT_DEACTIVATABLE, SESSION_ALREADY_FINISHED,
    SESSION_NOT_ANSWERABLE, SESSION_TIMED_OUT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    Answer,
    Finish,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExamEvent {
    Activate,
    Deactivate,
}

pub(crate) fn next_session_status(
    current: SessionStatus,
    event: SessionEvent,
) -> Result<SessionStatus, ServiceError> {
    use SessionStatus::{Finished, InProgress, Started, Timeout};

    match (current, event) {
        (Started | InProgress, SessionEvent::Answer) => Ok(InProgress),
        (Finished | Timeout, SessionEvent::Answer) => {
            Err(ServiceError::failed_precondition(SESSION_NOT_ANSWERABLE))
        }
        (Started | InProgress, SessionEvent::Finish) => Ok(Finished),
        (Started | InProgress, SessionEvent::Timeout) => Ok(Timeout),
        (Finished, SessionEvent::Finish | SessionEvent::Timeout) => {
            Err(ServiceError::failed_precondition(SESSION_ALREADY_FINISHED))
        }
        (Timeout, SessionEvent::Finish | SessionEvent::Timeout) => {
            Err(ServiceError::failed_precondition(SESSION_TIMED_OUT))
        }
    }
}

pub(crate) fn next_exam_state(
    current: ExamState,
    event: ExamEvent,
) -> Result<ExamState, ServiceError> {
    match (current, event) {
        (ExamState::Created, ExamEvent::Activate) => Ok(ExamState::Active),
        (ExamState::Active, ExamEvent::Deactivate) => Ok(ExamState::Finished),
        (_, ExamEvent::Activate) => Err(ServiceError::failed_precondition(EXAM_NOT_ACTIVATABLE)),
        (_, ExamEvent::Deactivate) => {
            Err(ServiceError::failed_precondition(EXAM_NOT_DEACTIVATABLE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_answer_moves_started_to_in_progress() {
        assert_eq!(
            next_session_status(SessionStatus::Started, SessionEvent::Answer),
            Ok(SessionStatus::InProgress)
        );
        assert_eq!(
            next_session_status(SessionStatus::InProgress, SessionEvent::Answer),
            Ok(SessionStatus::InProgress)
        );
    }

    #[test]
    fn terminal_sessions_reject_answers() {
        for status in [SessionStatus::Finished, SessionStatus::Timeout] {
            assert_eq!(
                next_session_status(status, SessionEvent::Answer),
                Err(ServiceError::FailedPrecondition(SESSION_NOT_ANSWERABLE.to_string()))
            );
        }
    }

    #[test]
    fn live_sessions_can_finish_or_time_out() {
        for status in SessionStatus::LIVE {
            assert_eq!(
                next_session_status(status, SessionEvent::Finish),
                Ok(SessionStatus::Finished)
            );
            assert_eq!(
                next_session_status(status, SessionEvent::Timeout),
                Ok(SessionStatus::Timeout)
            );
        }
    }

    #[test]
    fn terminal_states_are_absorbing_with_distinct_messages() {
        assert_eq!(
            next_session_status(SessionStatus::Finished, SessionEvent::Finish),
            Err(ServiceError::FailedPrecondition(SESSION_ALREADY_FINISHED.to_string()))
        );
        assert_eq!(
            next_session_status(SessionStatus::Timeout, SessionEvent::Finish),
            Err(ServiceError::FailedPrecondition(SESSION_TIMED_OUT.to_string()))
        );
        assert!(next_session_status(SessionStatus::Finished, SessionEvent::Timeout).is_err());
        assert!(next_session_status(SessionStatus::Timeout, SessionEvent::Timeout).is_err());
    }

    #[test]
    fn exam_activation_is_monotonic() {
        assert_eq!(next_exam_state(ExamState::Created, ExamEvent::Activate), Ok(ExamState::Active));
        assert_eq!(
            next_exam_state(ExamState::Active, ExamEvent::Deactivate),
            Ok(ExamState::Finished)
        );

        for state in [ExamState::Active, ExamState::Finished] {
            assert_eq!(
                next_exam_state(state, ExamEvent::Activate),
                Err(ServiceError::FailedPrecondition(EXAM_NOT_ACTIVATABLE.to_string()))
            );
        }
        for state in [ExamState::Created, ExamState::Finished] {
            assert_eq!(
                next_exam_state(state, ExamEvent::Deactivate),
                Err(ServiceError::FailedPrecondition(EXAM_NOT_DEACTIVATABLE.to_string()))
            );
        }
    }
}
