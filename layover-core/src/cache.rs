use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Deterministic digest of a cache key's fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field-name/value encoding of a request. Fields are kept sorted by name,
/// so the order they were added in never reaches the fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKey {
    fields: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        // Sorted JSON object; a string map always serializes
        let canonical = serde_json::to_string(&self.fields).unwrap_or_default();
        Fingerprint(hex::encode(Sha256::digest(canonical.as_bytes())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CacheKey {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Identifies one search response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
}

impl SearchKey {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new()
            .with("origin", &self.origin)
            .with("dest", &self.destination)
            .with("date", self.date)
            .with("return_date", self.return_date)
    }
}

/// Identifies one itinerary detail response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailKey {
    pub itinerary_id: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
}

impl DetailKey {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new()
            .with("itineraryId", &self.itinerary_id)
            .with("origin", &self.origin)
            .with("dest", &self.destination)
            .with("date", self.date)
            .with("return_date", self.return_date)
    }
}

/// A provider response ready to be persisted
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub payload: String,
    pub success: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend failure: {0}")]
    Backend(String),
}

/// Eviction hook for cache backends. The default keeps entries forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Option<Duration>,
}

impl CachePolicy {
    pub fn unbounded() -> Self {
        Self { ttl: None }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }

    pub fn is_unbounded(&self) -> bool {
        self.ttl.is_none()
    }
}

/// Storage for raw provider responses.
///
/// Implementations must tolerate concurrent reads and writes. Entries whose
/// `success` flag is false are never persisted.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<String>, CacheError>;

    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError>;
}

/// Read and decode a cached payload. Any backend or decoding failure is
/// reported as a miss.
pub async fn lookup<T: DeserializeOwned>(cache: &dyn ResponseCache, key: &CacheKey) -> Option<T> {
    let fingerprint = key.fingerprint();
    match cache.get(&fingerprint).await {
        Ok(Some(payload)) => match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!("Cache hit for {}", fingerprint);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", fingerprint, e);
                None
            }
        },
        Ok(None) => {
            debug!("Cache miss for {}", fingerprint);
            None
        }
        Err(e) => {
            warn!("Cache read failed for {}, falling back to provider: {}", fingerprint, e);
            None
        }
    }
}

/// Persist a provider response if it succeeded. Write failures are logged and
/// otherwise ignored.
pub async fn store<T: Serialize>(cache: &dyn ResponseCache, key: &CacheKey, value: &T, success: bool) {
    if !success {
        debug!("Not caching unsuccessful response");
        return;
    }

    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to serialize response for cache: {}", e);
            return;
        }
    };

    let entry = CacheEntry {
        fingerprint: key.fingerprint(),
        payload,
        success,
    };

    if let Err(e) = cache.put(&entry).await {
        warn!("Cache write failed for {}: {}", entry.fingerprint, e);
    }
}
