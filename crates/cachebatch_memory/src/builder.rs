// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.
//!
//! The builder abstracts the underlying moka configuration so the public API does not
//! expose moka's types.

use std::marker::PhantomData;

use tick::Clock;

use crate::store::MemoryStore;

/// Builder for configuring a [`MemoryStore`].
///
/// There is no store-wide TTL: every entry expires according to its own TTL, as
/// computed by the writer.
///
/// # Examples
///
/// ```
/// use cachebatch_memory::MemoryStore;
/// use tick::Clock;
///
/// let store = MemoryStore::<String>::builder()
///     .max_capacity(10_000)
///     .initial_capacity(128)
///     .name("users")
///     .build(Clock::new_frozen());
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder<V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<V>,
}

impl<V> Default for MemoryStoreBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryStoreBuilder<V> {
    /// Creates a new builder for an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum number of entries.
    ///
    /// Once the capacity is reached, entries are evicted using moka's `TinyLFU` policy.
    /// If not set, the store is bounded only by available memory.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint) for the store.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name for the store, used in debugging output of the backing cache.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`MemoryStore`].
    ///
    /// The `clock` is used to stamp written entries and to check expiration on reads.
    #[must_use]
    pub fn build(self, clock: Clock) -> MemoryStore<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        MemoryStore::from_builder(&self, clock)
    }
}
