//! Time-bounded cache for fundamentals lookups

use crate::model::Fundamentals;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Fundamentals keyed by symbol, shared by clones
#[derive(Clone)]
pub struct FundamentalsCache {
    cache: Arc<RwLock<TimedCache<String, Fundamentals>>>,
}

impl FundamentalsCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub async fn get(&self, symbol: &str) -> Option<Fundamentals> {
        let mut cache = self.cache.write().await;
        cache.cache_get(symbol).cloned()
    }

    pub async fn insert(&self, symbol: impl Into<String>, value: Fundamentals) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(symbol.into(), value);
    }

    /// Return the cached value or fetch, store and return a fresh one
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, symbol: &str, fetcher: F) -> Result<Fundamentals, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Fundamentals, E>>,
    {
        if let Some(value) = self.get(symbol).await {
            tracing::debug!("Fundamentals cache hit for {symbol}");
            return Ok(value);
        }

        let value = fetcher().await?;
        self.insert(symbol, value.clone()).await;
        Ok(value)
    }

    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
