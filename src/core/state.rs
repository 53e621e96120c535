use std::sync::Arc;

use sqlx::PgPool;

use crate::core::{config::Settings, redis::RedisHandle};
use crate::services::answer_keys::PgAnswerKeySource;
use crate::services::exam_authority::{self, ExamAuthority};
use crate::services::exam_duration::ExamDurationSource;
use crate::services::scoring_aggregator::ScoringAggregator;
use crate::services::session_manager::SessionManager;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    redis: RedisHandle,
    sessions: SessionManager,
    scoring: ScoringAggregator,
}

impl AppState {
    /// Wires the services against the exam authority selected by settings.
    pub(crate) fn new(settings: Settings, db: PgPool, redis: RedisHandle) -> anyhow::Result<Self> {
        let authority = exam_authority::from_settings(&settings, db.clone())?;
        Ok(Self::with_authority(settings, db, redis, authority))
    }

    pub(crate) fn with_authority(
        settings: Settings,
        db: PgPool,
        redis: RedisHandle,
        authority: Arc<dyn ExamAuthority>,
    ) -> Self {
        let durations = ExamDurationSource::new(
            authority.clone(),
            redis.clone(),
            settings.sessions().duration_cache_seconds,
        );
        let sessions = SessionManager::new(db.clone(), authority, durations);
        let scoring = ScoringAggregator::new(
            db.clone(),
            sessions.clone(),
            Arc::new(PgAnswerKeySource::new(db.clone())),
        );

        Self { inner: Arc::new(InnerState { settings, db, redis, sessions, scoring }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn redis(&self) -> &RedisHandle {
        &self.inner.redis
    }

    pub(crate) fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub(crate) fn scoring(&self) -> &ScoringAggregator {
        &self.inner.scoring
    }
}
