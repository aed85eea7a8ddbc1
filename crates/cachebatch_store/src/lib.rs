// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage abstractions consumed by batch cache-aside resolution.
//!
//! This crate defines the [`CacheStore`] trait that batch-capable cache backends
//! implement, along with [`CacheKey`] for identifying entries, [`CacheEntry`] for
//! storing values with expiration metadata and [`Error`] for fallible operations,
//! tagged with the [`StoreOperation`] that failed.
//!
//! # Overview
//!
//! A batch resolver looks up many keys at once and writes back many entries at once,
//! so the store contract is expressed in terms of multi-key operations only. Implement
//! [`CacheStore`] for your backend, then hand it to `cachebatch` to get order-preserving
//! batch resolution on top.
//!
//! # Implementing a Store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! use cachebatch_store::{CacheEntry, CacheKey, CacheStore, Error};
//!
//! struct SimpleStore<V>(RwLock<HashMap<CacheKey, CacheEntry<V>>>);
//!
//! impl<V> CacheStore<V> for SimpleStore<V>
//! where
//!     V: Clone + Send + Sync,
//! {
//!     async fn multi_get(&self, keys: &[CacheKey]) -> Result<HashMap<CacheKey, CacheEntry<V>>, Error> {
//!         let data = self.0.read().unwrap();
//!         Ok(keys
//!             .iter()
//!             .filter_map(|key| data.get(key).map(|entry| (key.clone(), entry.clone())))
//!             .collect())
//!     }
//!
//!     async fn multi_set(&self, entries: Vec<(CacheKey, CacheEntry<V>)>) -> Result<(), Error> {
//!         self.0.write().unwrap().extend(entries);
//!         Ok(())
//!     }
//! }
//! ```

mod entry;
pub mod error;
mod key;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use entry::CacheEntry;
#[doc(inline)]
pub use error::{Error, Result, StoreOperation};
#[doc(inline)]
pub use key::CacheKey;
#[doc(inline)]
pub use store::CacheStore;
