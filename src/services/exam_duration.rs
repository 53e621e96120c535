use std::sync::Arc;

use crate::core::redis::RedisHandle;
use crate::services::error::ServiceResult;
use crate::services::exam_authority::ExamAuthority;

/// Exam durations read through the authority with a short Redis cache in
/// front. Cache failures are logged and fall through to the authority.
#[derive(Clone)]
pub(crate) struct ExamDurationSource {
    authority: Arc<dyn ExamAuthority>,
    redis: RedisHandle,
    ttl_seconds: u64,
}

impl ExamDurationSource {
    pub(crate) fn new(authority: Arc<dyn ExamAuthority>, redis: RedisHandle, ttl_seconds: u64) -> Self {
        Self { authority, redis, ttl_seconds }
    }

    pub(crate) async fn duration_minutes(&self, exam_id: &str) -> ServiceResult<i32> {
        let key = cache_key(exam_id);

        if self.ttl_seconds > 0 {
            match self.redis.get_i64(&key).await {
                Ok(Some(cached)) => {
                    if let Ok(minutes) = i32::try_from(cached) {
                        return Ok(minutes);
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, exam_id, "Duration cache read failed"),
            }
        }

        let minutes = self.authority.exam_snapshot(exam_id).await?.duration_minutes;

        if self.ttl_seconds > 0 {
            if let Err(err) =
                self.redis.set_i64_ex(&key, i64::from(minutes), self.ttl_seconds).await
            {
                tracing::warn!(error = %err, exam_id, "Duration cache write failed");
            }
        }

        Ok(minutes)
    }
}

fn cache_key(exam_id: &str) -> String {
    format!("exam:duration:{exam_id}")
}
