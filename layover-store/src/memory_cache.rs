use async_trait::async_trait;
use layover_core::cache::{CacheEntry, CacheError, CachePolicy, Fingerprint, ResponseCache};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

struct StoredResponse {
    payload: String,
    expires_at: Option<Instant>,
}

/// In-process response cache for development and tests
pub struct InMemoryResponseCache {
    entries: RwLock<HashMap<Fingerprint, StoredResponse>>,
    policy: CachePolicy,
}

impl InMemoryResponseCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop expired entries. Returns how many were removed.
    ///
    /// Reads already skip expired entries; nothing calls this on a timer, so
    /// owners of a TTL cache run it themselves to reclaim memory.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at.map_or(true, |at| at > now));
        before - entries.len()
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new(CachePolicy::unbounded())
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(fingerprint)
            .filter(|stored| stored.expires_at.map_or(true, |at| at > Instant::now()))
            .map(|stored| stored.payload.clone()))
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        if !entry.success {
            return Ok(());
        }
        let expires_at = self.policy.ttl.map(|ttl| Instant::now() + ttl);
        self.entries.write().await.insert(
            entry.fingerprint.clone(),
            StoredResponse {
                payload: entry.payload.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layover_core::cache::CacheKey;
    use std::sync::Arc;
    use std::time::Duration;

    fn entry(key: &str, payload: &str, success: bool) -> CacheEntry {
        CacheEntry {
            fingerprint: CacheKey::new().with("k", key).fingerprint(),
            payload: payload.to_string(),
            success,
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = InMemoryResponseCache::default();
        let e = entry("a", "{}", true);
        cache.put(&e).await.unwrap();
        assert_eq!(cache.get(&e.fingerprint).await.unwrap(), Some("{}".to_string()));
    }

    #[tokio::test]
    async fn test_unsuccessful_entries_are_not_stored() {
        let cache = InMemoryResponseCache::default();
        let e = entry("a", "{}", false);
        cache.put(&e).await.unwrap();
        assert_eq!(cache.get(&e.fingerprint).await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_ttl_expires_entries() {
        let cache = InMemoryResponseCache::new(CachePolicy::with_ttl(Duration::from_millis(20)));
        let e = entry("a", "{}", true);
        cache.put(&e).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get(&e.fingerprint).await.unwrap(), None);
        assert_eq!(cache.purge_expired().await, 1);
    }

    #[tokio::test]
    async fn test_purge_keeps_live_entries() {
        let cache = InMemoryResponseCache::new(CachePolicy::with_ttl(Duration::from_secs(60)));
        cache.put(&entry("a", "{}", true)).await.unwrap();

        assert_eq!(cache.purge_expired().await, 0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = Arc::new(InMemoryResponseCache::default());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.put(&entry(&i.to_string(), "{}", true)).await.unwrap();
                // Same key from every task: last writer wins
                cache.put(&entry("shared", "{}", true)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.len().await, 17);
    }
}
