use serde::Serialize;
use time::PrimitiveDateTime;

use crate::core::time::plus_minutes;
use crate::db::types::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct RemainingTime {
    pub(crate) remaining_minutes: i64,
    pub(crate) remaining_seconds: i64,
}

impl RemainingTime {
    pub(crate) const ZERO: Self = Self { remaining_minutes: 0, remaining_seconds: 0 };
}

/// Time left before `start_time + duration`, clamped at zero and truncated
/// to whole seconds. Terminal sessions always report zero.
pub(crate) fn remaining_time(
    status: SessionStatus,
    start_time: PrimitiveDateTime,
    duration_minutes: i32,
    now: PrimitiveDateTime,
) -> RemainingTime {
    if status.is_terminal() {
        return RemainingTime::ZERO;
    }

    let deadline = plus_minutes(start_time, duration_minutes);
    let left = (deadline - now).whole_seconds();
    if left <= 0 {
        return RemainingTime::ZERO;
    }

    RemainingTime { remaining_minutes: left / 60, remaining_seconds: left % 60 }
}
