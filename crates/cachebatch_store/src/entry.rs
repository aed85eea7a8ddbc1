// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{
    ops::Deref,
    time::{Duration, SystemTime},
};

/// A cached value with expiration metadata.
///
/// `CacheEntry` pairs a value with the TTL it was written with and the time it was
/// stored. Stores use this to drop expired entries and to report the residual
/// expiration of a hit.
///
/// # Examples
///
/// ```
/// use cachebatch_store::CacheEntry;
/// use std::time::Duration;
///
/// // Entry that never expires
/// let entry = CacheEntry::new(42);
/// assert_eq!(*entry.value(), 42);
/// assert_eq!(entry.ttl(), None);
///
/// // Entry with a per-entry TTL
/// let entry = CacheEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    cached_at: Option<SystemTime>,
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry that never expires.
    ///
    /// The timestamp is set by the store when the entry is written.
    pub fn new(value: V) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: None,
        }
    }

    /// Creates an entry that expires `ttl` after it is stored.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: Some(ttl),
        }
    }

    /// Returns the time the entry was stored.
    ///
    /// Returns `None` if the entry has not been written to a store yet.
    #[must_use]
    pub fn cached_at(&self) -> Option<SystemTime> {
        self.cached_at
    }

    /// Sets the time the entry was stored.
    ///
    /// This is typically called by the store implementation when writing.
    pub fn set_cached_at(&mut self, cached_at: SystemTime) {
        self.cached_at = Some(cached_at);
    }

    /// Returns the TTL the entry was written with, if it expires.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns how much longer the entry stays valid at `now`.
    ///
    /// Returns `None` for entries without TTL. An entry that has not been stored yet
    /// reports its full TTL.
    ///
    /// ```
    /// use cachebatch_store::CacheEntry;
    /// use std::time::{Duration, SystemTime};
    ///
    /// let stored_at = SystemTime::UNIX_EPOCH;
    /// let mut entry = CacheEntry::with_ttl(1, Duration::from_secs(60));
    /// entry.set_cached_at(stored_at);
    ///
    /// let remaining = entry.remaining_ttl(stored_at + Duration::from_secs(20));
    /// assert_eq!(remaining, Some(Duration::from_secs(40)));
    /// ```
    #[must_use]
    pub fn remaining_ttl(&self, now: SystemTime) -> Option<Duration> {
        let ttl = self.ttl?;
        let Some(cached_at) = self.cached_at else {
            return Some(ttl);
        };
        // A clock that went backwards leaves the full TTL.
        let elapsed = now.duration_since(cached_at).unwrap_or_default();
        Some(ttl.saturating_sub(elapsed))
    }

    /// Returns `true` if the entry has outlived its TTL at `now`.
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.remaining_ttl(now).is_some_and(|remaining| remaining.is_zero())
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for CacheEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}
