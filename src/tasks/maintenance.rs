use anyhow::{Context, Result};

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;

const TIMEOUT_BATCH: i64 = 500;
const SCORING_BATCH: i64 = 200;

pub(crate) async fn close_timed_out_sessions(state: &AppState) -> Result<usize> {
    let closed = state
        .sessions()
        .close_overdue_sessions(primitive_now_utc(), TIMEOUT_BATCH)
        .await
        .context("Failed to close timed out sessions")?;

    if closed > 0 {
        tracing::info!(closed_sessions = closed, "Closed timed out sessions");
    }

    Ok(closed)
}

pub(crate) async fn score_finished_sessions(state: &AppState) -> Result<usize> {
    let scored = state
        .scoring()
        .score_pending_sessions(SCORING_BATCH)
        .await
        .context("Failed to score finished sessions")?;

    if scored > 0 {
        tracing::info!(scored_sessions = scored, "Scored finished sessions");
    }

    Ok(scored)
}
