// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Batch cache-aside resolution.
//!
//! A method that takes a collection of items and returns a collection of values can be
//! served from a cache item by item. For each call, [`BatchResolver`]:
//! - derives one cache key per item and looks all of them up in a single batched read,
//! - calls the [`Loader`] once with only the items that missed, in the caller's container family,
//! - writes the loaded values back in a single batched write, keyed from each value,
//! - merges hits and loaded values in input order and rebuilds the declared return family.
//!
//! Keys and expirations come from expressions evaluated by an [`ExpressionEvaluator`];
//! storage is any [`CacheStore`]. Methods are checked once up front by [`validate`].
//!
//! # Examples
//!
//! ```
//! use cachebatch::{
//!     Argument, BatchResolver, CacheKey, CacheStore, Container, DeclaredType, Invocation, Loaded, MethodSignature,
//! };
//! # use cachebatch::{ArgRef, Args, BoxError, ExpressionEvaluator};
//! # struct Ids;
//! # impl ExpressionEvaluator<u64, String> for Ids {
//! #     fn eval_key(&self, _: &str, _: &str, _: &str, args: Args<'_, u64>, value: Option<&String>) -> Result<String, BoxError> {
//! #         match (value, args.get(0)) {
//! #             (Some(value), _) => Ok(value.trim_start_matches("order-").to_string()),
//! #             (None, Some(ArgRef::Item(id))) => Ok(id.to_string()),
//! #             _ => Err("no key".into()),
//! #         }
//! #     }
//! #     fn eval_field(&self, _: &str, _: Args<'_, u64>, _: Option<&String>) -> Result<String, BoxError> { Ok(String::new()) }
//! #     fn eval_expire(&self, _: &str, _: Args<'_, u64>, _: &String) -> Result<serde_json::Value, BoxError> { Ok(0.into()) }
//! # }
//! use std::time::Duration;
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let resolver = BatchResolver::builder::<u64, String>(Clock::new_frozen())
//!     .memory()
//!     .evaluator(Ids)
//!     .method(MethodSignature::new("orders", vec![DeclaredType::List], DeclaredType::List))
//!     .key_expression("#id")
//!     .namespace("orders")
//!     .expire(Duration::from_secs(60))
//!     .build()?;
//!
//! let loader = |call: Invocation<u64>| async move {
//!     let Some(Argument::Batch(ids)) = call.argument(0) else {
//!         return Err("missing batch");
//!     };
//!     Ok(Loaded::from(ids.iter().map(|id| format!("order-{id}")).collect::<Vec<_>>()))
//! };
//!
//! let call = Invocation::new("orders", "orders", vec![Argument::Batch(Container::from(vec![7, 9]))]);
//! let orders = resolver.resolve(call, &loader).await?;
//! assert_eq!(orders.len(), 2);
//!
//! let cached = resolver.store().multi_get(&[CacheKey::new("7").with_namespace("orders")]).await;
//! assert!(cached.is_ok_and(|hits| hits.len() == 1));
//! # Ok::<(), cachebatch::Error>(())
//! # });
//! ```

mod builder;
mod container;
mod error;
mod expression;
mod invocation;
mod key;
mod loader;
mod resolver;
mod telemetry;
mod ttl;
mod validation;

#[doc(inline)]
pub use builder::BatchResolverBuilder;
#[cfg(feature = "memory")]
#[doc(inline)]
pub use cachebatch_memory::{MemoryStore, MemoryStoreBuilder};
#[doc(inline)]
pub use cachebatch_store::{CacheEntry, CacheKey, CacheStore};
#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use cachebatch_store::testing::{MockStore, StoreOp};
#[doc(inline)]
pub use container::{Container, ContainerKind, DeclaredType};
#[doc(inline)]
pub use error::{BoxError, Error, ErrorKind, Result};
#[doc(inline)]
pub use expression::ExpressionEvaluator;
#[doc(inline)]
pub use invocation::{ArgRef, Args, Argument, Invocation, MethodSignature};
#[doc(inline)]
pub use loader::{Loaded, Loader};
#[doc(inline)]
pub use resolver::{BatchResolver, LookupFailurePolicy};
#[doc(inline)]
pub use telemetry::{BatchName, BatchTelemetry, TelemetryConfig};
#[doc(inline)]
pub use validation::{BatchPlan, validate};
