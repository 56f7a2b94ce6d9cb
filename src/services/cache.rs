use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::CandidateKind;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for document-store reads and ranking results.
///
/// The in-memory tier (moka) absorbs the hot path within one instance;
/// Redis is shared across instances. Both tiers expire on the same TTL,
/// which also bounds how stale a collection read can get - membership and
/// tag edits happen in the main backend and only reach this service
/// through the store.
pub struct CacheManager {
    l1: moka::future::Cache<String, String>,
    l2: Mutex<ConnectionManager>,
    ttl: Duration,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let ttl = Duration::from_secs(ttl_secs);

        let client = redis::Client::open(redis_url)?;
        let l2 = ConnectionManager::new(client).await?;

        let l1 = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(ttl)
            .build();

        Ok(Self {
            l1,
            l2: Mutex::new(l2),
            ttl,
        })
    }

    /// Get a value, trying the in-memory tier before Redis
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(json) = self.l1.get(key).await {
            tracing::trace!("L1 hit: {}", key);
            return Ok(serde_json::from_str(&json)?);
        }

        let found: Option<String> = self.l2.lock().await.get(key).await?;

        match found {
            Some(json) => {
                tracing::trace!("L2 hit: {}", key);
                let value = serde_json::from_str(&json)?;
                self.l1.insert(key.to_string(), json).await;
                Ok(value)
            }
            None => Err(CacheError::CacheMiss(key.to_string())),
        }
    }

    /// Write a value to both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1.insert(key.to_string(), json.clone()).await;
        self.l2
            .lock()
            .await
            .set_ex::<_, _, ()>(key, json, self.ttl.as_secs())
            .await?;

        tracing::trace!("Cached: {}", key);
        Ok(())
    }

    /// Drop every entry matching a glob pattern.
    ///
    /// The in-memory tier cannot match patterns and is cleared wholesale;
    /// entries repopulate on the next read.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        self.l1.invalidate_all();

        let mut l2 = self.l2.lock().await;
        let matching: Vec<String> = l2.keys(pattern).await?;
        if !matching.is_empty() {
            l2.del::<_, ()>(matching).await?;
        }

        tracing::debug!("Invalidated pattern: {}", pattern);
        Ok(())
    }

    /// Snapshot of cache state, for logging and debugging
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1.entry_count(),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a cached document-store collection listing
    pub fn collection(kind: CandidateKind) -> String {
        format!("collection:{}", kind.as_str())
    }

    /// Key for a cached ranking response
    pub fn ranking(kind: CandidateKind, user_id: i64, limit: usize) -> String {
        format!("rank:{}:{}:{}", kind.as_str(), user_id, limit)
    }

    /// Pattern matching every cached ranking for one user and kind
    pub fn ranking_pattern(kind: CandidateKind, user_id: i64) -> String {
        format!("rank:{}:{}:*", kind.as_str(), user_id)
    }
}
