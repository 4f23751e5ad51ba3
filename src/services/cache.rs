use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::JobRequirements;
use crate::services::repository::{JobStore, RepositoryError};

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

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache, L2 is Redis and shared across instances.
/// Without a Redis connection the manager runs on L1 alone.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// Create an L1-only cache manager
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1_cache
                    .insert(key.to_string(), json.as_bytes().to_vec())
                    .await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a job's requirements
    pub fn job(job_id: u64) -> String {
        format!("job:{}", job_id)
    }
}

/// JobStore decorator that serves requirements from the cache tiers
///
/// Cache failures never fail a lookup; they fall through to the inner store.
pub struct CachedJobStore {
    inner: Arc<dyn JobStore>,
    cache: Arc<CacheManager>,
}

impl CachedJobStore {
    pub fn new(inner: Arc<dyn JobStore>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl JobStore for CachedJobStore {
    async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError> {
        let key = CacheKey::job(job_id);

        match self.cache.get::<JobRequirements>(&key).await {
            Ok(requirements) => return Ok(requirements),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }

        let requirements = self.inner.get_job_requirements(job_id).await?;

        if let Err(e) = self.cache.set(&key, &requirements).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }

        Ok(requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JobStore for CountingStore {
        async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if job_id == 404 {
                return Err(RepositoryError::NotFound(format!("job {}", job_id)));
            }
            Ok(JobRequirements {
                job_id,
                min_experience: 2.0,
                min_notice_period: 30,
                location_ids: vec![1],
                skill_ids: vec![2],
                work_mode_ids: vec![],
                job_type_ids: vec![],
                qualification_ids: vec![],
                shift_ids: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_cached_store_hits_inner_once() {
        let inner = Arc::new(CountingStore {
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(CacheManager::in_memory(100, 60));
        let store = CachedJobStore::new(inner.clone(), cache);

        let first = store.get_job_requirements(5).await.unwrap();
        let second = store.get_job_requirements(5).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failures_are_not_cached() {
        let inner = Arc::new(CountingStore {
            calls: AtomicUsize::new(0),
        });
        let store = CachedJobStore::new(inner.clone(), Arc::new(CacheManager::in_memory(100, 60)));

        assert!(store.get_job_requirements(404).await.is_err());
        assert!(store.get_job_requirements(404).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::job(12), "job:12");
    }
}
