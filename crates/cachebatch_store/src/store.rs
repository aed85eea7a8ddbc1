// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for batch-capable cache stores.
//!
//! [`CacheStore`] is the only storage contract the batch resolver consumes. It is
//! deliberately small: one multi-key read and one multi-key write.

use std::collections::HashMap;

use crate::{CacheEntry, CacheKey, Error};

/// Trait for cache stores that read and write many keys per round trip.
///
/// Both operations are awaited one at a time by the caller. Implementations are free
/// to fan out across shards or connections internally, but must report a single
/// outcome per call.
///
/// `len` has a default implementation returning `None`, since not every store tracks
/// its size.
pub trait CacheStore<V>: Send + Sync {
    /// Looks up all `keys` and returns the entries that are present and not expired.
    ///
    /// Keys that are absent are simply missing from the returned map.
    fn multi_get(&self, keys: &[CacheKey]) -> impl Future<Output = Result<HashMap<CacheKey, CacheEntry<V>>, Error>> + Send;

    /// Writes all `entries`, replacing any existing entries under the same keys.
    fn multi_set(&self, entries: Vec<(CacheKey, CacheEntry<V>)>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the number of entries, if supported.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
