use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Activation state owned by the exam authority. Moves forward only:
/// created -> active -> finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "examstate", rename_all = "lowercase")]
pub(crate) enum ExamState {
    Created,
    Active,
    Finished,
}

/// Status of one student attempt. `Started` and `InProgress` are live;
/// `Finished` and `Timeout` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "sessionstatus", rename_all = "snake_case")]
pub(crate) enum SessionStatus {
    Started,
    InProgress,
    Finished,
    Timeout,
}

impl SessionStatus {
    pub(crate) const LIVE: [SessionStatus; 2] = [SessionStatus::Started, SessionStatus::InProgress];

    pub(crate) fn is_live(self) -> bool {
        Self::LIVE.contains(&self)
    }

    pub(crate) fn is_terminal(self) -> bool {
        !self.is_live()
    }
}
