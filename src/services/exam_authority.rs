use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::core::config::Settings;
use crate::core::time::format_primitive;
use crate::db::models::Exam;
use crate::db::types::ExamState;
use crate::repositories;
use crate::services::error::{ServiceError, ServiceResult, EXAM_NOT_FOUND};

/// Read-only view of an exam as published by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ExamSnapshot {
    pub(crate) id: String,
    pub(crate) state: ExamState,
    pub(crate) duration_minutes: i32,
    pub(crate) total_questions: i32,
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
}

impl From<Exam> for ExamSnapshot {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id,
            state: exam.state,
            duration_minutes: exam.duration_minutes,
            total_questions: exam.total_questions,
            start_time: exam.start_time.map(format_primitive),
            end_time: exam.end_time.map(format_primitive),
        }
    }
}

/// Oracle for exam activation and duration. Sessions consult it on start and
/// whenever a deadline is computed; it is never cached for activation.
#[async_trait]
pub(crate) trait ExamAuthority: Send + Sync {
    async fn exam_snapshot(&self, exam_id: &str) -> ServiceResult<ExamSnapshot>;

    async fn is_exam_active(&self, exam_id: &str) -> ServiceResult<bool> {
        Ok(self.exam_snapshot(exam_id).await?.state == ExamState::Active)
    }
}

/// Authority co-hosted with the session store.
#[derive(Clone)]
pub(crate) struct PgExamAuthority {
    pool: PgPool,
}

impl PgExamAuthority {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamAuthority for PgExamAuthority {
    async fn exam_snapshot(&self, exam_id: &str) -> ServiceResult<ExamSnapshot> {
        let exam = repositories::exams::find_by_id(&self.pool, exam_id)
            .await
            .map_err(|e| ServiceError::internal(e, "Failed to fetch exam"))?
            .ok_or_else(|| ServiceError::not_found(EXAM_NOT_FOUND))?;

        Ok(exam.into())
    }
}

/// Remote authority reached over its state endpoint. Calls are not retried;
/// any transport or decoding failure surfaces as `Internal`.
#[derive(Clone)]
pub(crate) struct HttpExamAuthority {
    client: Client,
    base_url: Url,
}

impl HttpExamAuthority {
    pub(crate) fn new(base_url: &str, api_prefix: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("Failed to build exam authority HTTP client")?;

        let raw = format!("{}{}", base_url.trim_end_matches('/'), api_prefix.trim_end_matches('/'));
        let base_url = Url::parse(&raw).context("Invalid exam authority URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Exam authority URL cannot carry a path: {raw}");
        }

        Ok(Self { client, base_url })
    }

    /// The exam id is pushed as a single escaped segment, so `/`, `?` and `#`
    /// inside it cannot address another resource.
    fn state_url(&self, exam_id: &str) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::internal(&self.base_url, "Exam authority URL has no path"))?
            .pop_if_empty()
            .push("exams")
            .push(exam_id)
            .push("state");
        Ok(url)
    }
}

#[async_trait]
impl ExamAuthority for HttpExamAuthority {
    async fn exam_snapshot(&self, exam_id: &str) -> ServiceResult<ExamSnapshot> {
        let response = self
            .client
            .get(self.state_url(exam_id)?)
            .send()
            .await
            .map_err(|e| ServiceError::internal(e, "Exam authority request failed"))?;

        match response.status() {
            StatusCode::OK => {
                let snapshot = response.json::<ExamSnapshot>().await.map_err(|e| {
                    ServiceError::internal(e, "Exam authority returned invalid payload")
                })?;
                if snapshot.id != exam_id {
                    return Err(ServiceError::internal(
                        format!("asked for {exam_id:?}, got {:?}", snapshot.id),
                        "Exam authority answered for a different exam",
                    ));
                }
                Ok(snapshot)
            }
            StatusCode::NOT_FOUND => Err(ServiceError::not_found(EXAM_NOT_FOUND)),
            status => Err(ServiceError::internal(status, "Exam authority returned unexpected status")),
        }
    }
}

pub(crate) fn from_settings(settings: &Settings, pool: PgPool) -> anyhow::Result<Arc<dyn ExamAuthority>> {
    let Some(base_url) = settings.exam_authority().base_url.as_deref() else {
        return Ok(Arc::new(PgExamAuthority::new(pool)));
    };

    tracing::info!(base_url, "Using remote exam authority");
    let timeout = Duration::from_secs(settings.exam_authority().request_timeout_seconds);
    let authority = HttpExamAuthority::new(base_url, &settings.api().api_v1_str, timeout)?;
    Ok(Arc::new(authority))
}
