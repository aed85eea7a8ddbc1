// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, a configurable in-memory store that records
//! every multi-key operation and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheEntry, CacheKey, CacheStore, Error, StoreOperation};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<V> {
    /// A multi-get was performed for the given keys, in request order.
    MultiGet(Vec<CacheKey>),
    /// A multi-set was performed with the given entries, in request order.
    MultiSet(Vec<(CacheKey, CacheEntry<V>)>),
}

type FailPredicate<V> = Box<dyn Fn(&StoreOp<V>) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// The store keeps entries in memory, never expires them, and records every call so
/// tests can assert exactly which keys were read and which entries were written.
///
/// # Examples
///
/// ```
/// use cachebatch_store::testing::{MockStore, StoreOp};
/// use cachebatch_store::{CacheEntry, CacheKey, CacheStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::<i32>::new();
/// let key = CacheKey::new("a");
///
/// store.multi_set(vec![(key.clone(), CacheEntry::new(1))]).await.unwrap();
/// let hits = store.multi_get(&[key.clone()]).await.unwrap();
/// assert_eq!(*hits[&key].value(), 1);
///
/// assert_eq!(store.operations().len(), 2);
/// assert!(matches!(store.operations()[1], StoreOp::MultiGet(_)));
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use cachebatch_store::testing::{MockStore, StoreOp};
/// use cachebatch_store::{CacheKey, CacheStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::<i32>::new();
///
/// // Fail all lookups
/// store.fail_when(|op| matches!(op, StoreOp::MultiGet(_)));
/// assert!(store.multi_get(&[CacheKey::new("a")]).await.is_err());
/// # });
/// ```
pub struct MockStore<V> {
    data: Arc<Mutex<HashMap<CacheKey, CacheEntry<V>>>>,
    operations: Arc<Mutex<Vec<StoreOp<V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<V>>>>,
}

impl<V> std::fmt::Debug for MockStore<V>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<V> Clone for MockStore<V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<V> Default for MockStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MockStore<V> {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(HashMap::new())
    }

    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<CacheKey, CacheEntry<V>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// Failed operations are still recorded.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    fn should_fail(&self, op: &StoreOp<V>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<V> MockStore<V>
where
    V: Clone,
{
    /// Returns a clone of the stored entry under `key`.
    #[must_use]
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.data.lock().get(key).cloned()
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp<V>) {
        self.operations.lock().push(op);
    }
}

impl<V> CacheStore<V> for MockStore<V>
where
    V: Clone + Send + Sync,
{
    async fn multi_get(&self, keys: &[CacheKey]) -> Result<HashMap<CacheKey, CacheEntry<V>>, Error> {
        let op = StoreOp::MultiGet(keys.to_vec());
        let fail = self.should_fail(&op);
        self.record(op);
        if fail {
            return Err(Error::during(StoreOperation::MultiGet, "mock: multi_get failed"));
        }

        let data = self.data.lock();
        Ok(keys
            .iter()
            .filter_map(|key| data.get(key).map(|entry| (key.clone(), entry.clone())))
            .collect())
    }

    async fn multi_set(&self, entries: Vec<(CacheKey, CacheEntry<V>)>) -> Result<(), Error> {
        let op = StoreOp::MultiSet(entries.clone());
        let fail = self.should_fail(&op);
        self.record(op);
        if fail {
            return Err(Error::during(StoreOperation::MultiSet, "mock: multi_set failed"));
        }

        self.data.lock().extend(entries);
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}
