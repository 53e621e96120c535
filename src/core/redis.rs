use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::{cmd, AsyncCommands, Client, RedisError};
use tokio::sync::RwLock;

/// Optional Redis connection. Every call degrades to a no-op (or a miss)
/// while disconnected so callers fall back to the store of record.
#[derive(Clone)]
pub(crate) struct RedisHandle {
    url: String,
    manager: Arc<RwLock<Option<ConnectionManager>>>,
}

#[derive(Debug, Clone)]
pub(crate) enum RedisHealth {
    Healthy,
    Disconnected,
    Unhealthy(String),
}

impl RedisHandle {
    pub(crate) fn new(url: String) -> Self {
        Self { url, manager: Arc::new(RwLock::new(None)) }
    }

    pub(crate) async fn connect(&self) -> Result<(), RedisError> {
        let client = Client::open(self.url.clone())?;
        let manager = ConnectionManager::new(client).await?;
        let mut guard = self.manager.write().await;
        *guard = Some(manager);
        Ok(())
    }

    pub(crate) async fn disconnect(&self) {
        let mut guard = self.manager.write().await;
        *guard = None;
    }

    pub(crate) async fn health(&self) -> RedisHealth {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return RedisHealth::Disconnected;
        };

        match cmd("PING").query_async::<_, String>(&mut manager).await {
            Ok(_) => RedisHealth::Healthy,
            Err(err) => RedisHealth::Unhealthy(err.to_string()),
        }
    }

    pub(crate) async fn get_i64(&self, key: &str) -> Result<Option<i64>, RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(None);
        };

        manager.get::<_, Option<i64>>(key).await
    }

    pub(crate) async fn set_i64_ex(
        &self,
        key: &str,
        value: i64,
        ttl_seconds: u64,
    ) -> Result<(), RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(());
        };

        manager.set_ex::<_, _, ()>(key, value, ttl_seconds).await
    }
}

#[cfg(test)]
mod tests {
    use super::RedisHandle;
    use crate::core::config::Settings;
    use crate::test_support;
    use uuid::Uuid;

    #[tokio::test]
    async fn cached_value_round_trips_until_expiry() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        test_support::reset_redis(settings.redis().redis_url()).await.expect("redis reset");

        let redis = RedisHandle::new(settings.redis().redis_url());
        redis.connect().await.expect("redis connect");

        let key = format!("exam:duration:{}", Uuid::new_v4());
        assert_eq!(redis.get_i64(&key).await.expect("miss"), None);

        redis.set_i64_ex(&key, 90, 30).await.expect("set");
        assert_eq!(redis.get_i64(&key).await.expect("hit"), Some(90));
    }

    #[tokio::test]
    async fn disconnected_handle_misses_without_error() {
        let redis = RedisHandle::new("redis://127.0.0.1:1/0".to_string());

        assert_eq!(redis.get_i64("exam:duration:any").await.expect("miss"), None);
        redis.set_i64_ex("exam:duration:any", 1, 1).await.expect("noop");
        assert!(matches!(redis.health().await, super::RedisHealth::Disconnected));
    }
}
