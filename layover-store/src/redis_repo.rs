use async_trait::async_trait;
use layover_core::cache::{CacheEntry, CacheError, CachePolicy, Fingerprint, ResponseCache};
use redis::{AsyncCommands, RedisResult};
use tracing::debug;

const CACHE_PREFIX: &str = "httpcache";

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
    policy: CachePolicy,
}

impl RedisClient {
    pub async fn new(connection_string: &str, policy: CachePolicy) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client, policy })
    }

    fn cache_key(fingerprint: &Fingerprint) -> String {
        format!("{}:{}", CACHE_PREFIX, fingerprint)
    }

    pub async fn get_cached_response(&self, fingerprint: &Fingerprint) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(Self::cache_key(fingerprint)).await
    }

    pub async fn set_cached_response(&self, fingerprint: &Fingerprint, payload: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::cache_key(fingerprint);
        match self.policy.ttl {
            Some(ttl) => conn.set_ex(key, payload, ttl.as_secs().max(1)).await,
            None => conn.set(key, payload).await,
        }
    }

    /// Fixed-window counter. The expiry is set only when the window opens.
    pub async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let count: i64 = conn.incr(key, 1).await?;
        if opens_window(count) {
            let _: () = conn.expire(key, window_seconds).await?;
        }

        Ok(count <= limit)
    }
}

/// Whether this INCR result created the counter
fn opens_window(count: i64) -> bool {
    count == 1
}

#[async_trait]
impl ResponseCache for RedisClient {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<String>, CacheError> {
        self.get_cached_response(fingerprint)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        if !entry.success {
            return Ok(());
        }
        self.set_cached_response(&entry.fingerprint, &entry.payload)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        debug!("Cached response {}", entry.fingerprint);
        Ok(())
    }
}
