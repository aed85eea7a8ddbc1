// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory multi-key cache store backed by moka.
//!
//! This crate provides [`MemoryStore`], a concurrent in-process [`CacheStore`] that honors
//! the per-entry TTL carried by each [`CacheEntry`]. Expiration is evaluated against an
//! injected [`tick::Clock`], so tests can move time forward deterministically. Use
//! [`MemoryStoreBuilder`] to configure capacity without exposing moka types.
//!
//! # Quick Start
//!
//! ```
//! use cachebatch_memory::MemoryStore;
//! use cachebatch_store::{CacheEntry, CacheKey, CacheStore};
//! use std::time::Duration;
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let store = MemoryStore::<String>::builder().max_capacity(1000).build(Clock::new_frozen());
//!
//! let key = CacheKey::new("user:1");
//! store
//!     .multi_set(vec![(key.clone(), CacheEntry::with_ttl("alice".to_string(), Duration::from_secs(60)))])
//!     .await?;
//!
//! let hits = store.multi_get(&[key.clone()]).await?;
//! assert_eq!(hits[&key].value(), "alice");
//! # Ok::<(), cachebatch_store::Error>(())
//! # });
//! ```
//!
//! [`CacheStore`]: cachebatch_store::CacheStore
//! [`CacheEntry`]: cachebatch_store::CacheEntry

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
