//! Opt-in embedding cache.
//!
//! Embeddings are deterministic (same text, same model → same vector), so
//! repeated classification of identical posts — common when re-processing
//! scraped feeds — can skip the embedding collaborator entirely. The cache
//! sits in the engine's embed path, above the provider. Keyed on a content
//! hash of (model, text). Without a configured cache, no memory is
//! allocated and the path is zero-overhead.
//!
//! Cache hit/miss counts are emitted through the `metrics` facade.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::telemetry;
use crate::types::Embedding;

/// Configuration for the embedding cache.
///
/// Pass to [`VordrBuilder::embedding_cache()`](crate::VordrBuilder::embedding_cache)
/// to activate.
///
/// ```rust
/// # use vordr::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(10_000)
///     .ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// In-memory LRU + TTL cache for embeddings.
pub(crate) struct EmbeddingCache {
    cache: Cache<u64, Embedding>,
}

impl EmbeddingCache {
    /// Create a new cache with the given configuration.
    pub(crate) fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self { cache }
    }

    /// Look up a cached embedding.
    pub(crate) async fn get(&self, model: &str, text: &str) -> Option<Embedding> {
        let result = self.cache.get(&Self::key(model, text)).await;
        match result {
            Some(_) => metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1),
            None => metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1),
        }
        result
    }

    /// Insert an embedding.
    pub(crate) async fn insert(&self, model: &str, text: &str, embedding: Embedding) {
        self.cache.insert(Self::key(model, text), embedding).await;
    }

    fn key(model: &str, text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        "embed".hash(&mut hasher);
        model.hash(&mut hasher);
        text.hash(&mut hasher);
        hasher.finish()
    }
}
