use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::AnswerKeyEntry;
use crate::repositories;
use crate::services::error::{ServiceError, ServiceResult};

#[async_trait]
pub(crate) trait AnswerKeySource: Send + Sync {
    /// Ordered answer key for an exam; empty when the exam has no questions.
    async fn answer_key(&self, exam_id: &str) -> ServiceResult<Vec<AnswerKeyEntry>>;
}

#[derive(Clone)]
pub(crate) struct PgAnswerKeySource {
    pool: PgPool,
}

impl PgAnswerKeySource {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerKeySource for PgAnswerKeySource {
    async fn answer_key(&self, exam_id: &str) -> ServiceResult<Vec<AnswerKeyEntry>> {
        repositories::questions::list_answer_key(&self.pool, exam_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to load answer key"))
    }
}
