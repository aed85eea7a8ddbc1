// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory store implementation using moka.

use std::collections::HashMap;

use cachebatch_store::{CacheEntry, CacheKey, CacheStore, Error};
use moka::future::Cache;
use tick::Clock;

use crate::builder::MemoryStoreBuilder;

/// An in-memory [`CacheStore`] backed by moka.
///
/// Entries are stamped with the clock's system time when written. A read that finds
/// an entry whose TTL has elapsed reports a miss and leaves the entry in place until
/// it is overwritten or evicted, so callers only ever see live entries with their
/// residual expiration intact.
///
/// Cloning a `MemoryStore` yields a handle to the same underlying storage.
///
/// # Examples
///
/// ```
/// use cachebatch_memory::MemoryStore;
/// use cachebatch_store::{CacheKey, CacheStore};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let store = MemoryStore::<i32>::new(Clock::new_frozen());
/// let hits = store.multi_get(&[CacheKey::new("missing")]).await?;
/// assert!(hits.is_empty());
/// # Ok::<(), cachebatch_store::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<CacheKey, CacheEntry<V>>,
    clock: Clock,
}

impl<V> MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory store.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::builder().build(clock)
    }

    /// Creates a new in-memory store holding at most `max_capacity` entries.
    #[must_use]
    pub fn with_capacity(max_capacity: u64, clock: Clock) -> Self {
        Self::builder().max_capacity(max_capacity).build(clock)
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder<V> {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryStoreBuilder<V>, clock: Clock) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
            clock,
        }
    }

    /// Returns a reference to the clock used for expiration.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<V> CacheStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn multi_get(&self, keys: &[CacheKey]) -> Result<HashMap<CacheKey, CacheEntry<V>>, Error> {
        let now = self.clock.system_time();
        let mut hits = HashMap::with_capacity(keys.len());

        for key in keys {
            // Expired entries are not removed here; a concurrent write may already have replaced them.
            if let Some(entry) = self.inner.get(key).await
                && !entry.is_expired(now)
            {
                hits.insert(key.clone(), entry);
            }
        }

        Ok(hits)
    }

    async fn multi_set(&self, entries: Vec<(CacheKey, CacheEntry<V>)>) -> Result<(), Error> {
        let now = self.clock.system_time();
        for (key, mut entry) in entries {
            entry.set_cached_at(now);
            self.inner.insert(key, entry).await;
        }
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
