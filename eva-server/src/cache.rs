//! Time-to-live cache
//!
//! Used for the employee directory, which changes rarely and is expensive to
//! fetch. A failed fetch is never stored, so the next request retries.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache entry with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

/// Storage medium behind a [`TtlCache`]
#[async_trait]
pub trait CacheStorage<V>: Send + Sync {
    async fn load(&self, key: &str) -> Option<CacheEntry<V>>;
    async fn store(&self, key: &str, entry: CacheEntry<V>);
    async fn remove(&self, key: &str);
}

/// In-process storage
pub struct MemoryStorage<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> MemoryStorage<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V: Clone + Send + Sync> CacheStorage<V> for MemoryStorage<V> {
    async fn load(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn store(&self, key: &str, entry: CacheEntry<V>) {
        self.entries.write().await.insert(key.to_string(), entry);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

/// Read-through cache with per-call TTL
pub struct TtlCache<V, S = MemoryStorage<V>> {
    storage: Arc<S>,
    clock: Arc<dyn Clock>,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> Clone for TtlCache<V, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            clock: self.clock.clone(),
            _value: PhantomData,
        }
    }
}

impl<V: Clone + Send + Sync> TtlCache<V, MemoryStorage<V>> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), Arc::new(SystemClock))
    }
}

impl<V, S> TtlCache<V, S>
where
    V: Clone + Send + Sync,
    S: CacheStorage<V>,
{
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: Arc::new(storage),
            clock,
            _value: PhantomData,
        }
    }

    /// Live value for `key`, if any
    pub async fn get(&self, key: &str) -> Option<V> {
        let entry = self.storage.load(key).await?;
        (entry.expires_at > self.clock.now()).then_some(entry.value)
    }

    /// Returns the live value or calls `fetch` once and stores its success
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!(key, "Cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        match self.clock.now().checked_add(ttl) {
            Some(expires_at) => {
                self.storage
                    .store(
                        key,
                        CacheEntry {
                            value: value.clone(),
                            expires_at,
                        },
                    )
                    .await;
            }
            None => tracing::warn!(key, ?ttl, "TTL out of range, value not cached"),
        }
        Ok(value)
    }

    pub async fn invalidate(&self, key: &str) {
        self.storage.remove(key).await;
    }
}
