// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The downstream data source consulted for cache misses.


use crate::container::Container;
use crate::error::BoxError;
use crate::invocation::Invocation;

/// The result of one downstream call.
#[derive(Clone, Debug)]
pub enum Loaded<V> {
    /// A collection of values; the shape must match the declared return family.
    Batch(Container<V>),
    /// A single value. Never valid for a batched method.
    Single(V),
    /// No result at all. Nothing is written and the misses stay absent.
    Nothing,
}

impl<V> From<Container<V>> for Loaded<V> {
    fn from(batch: Container<V>) -> Self {
        Self::Batch(batch)
    }
}

impl<V> From<Vec<V>> for Loaded<V> {
    fn from(values: Vec<V>) -> Self {
        Self::Batch(Container::List(values))
    }
}

/// The authoritative source behind a cached method.
///
/// The resolver calls [`Loader::load`] at most once per resolution, with the batch argument
/// replaced by the items that missed the cache, in the same container family the caller
/// used.
///
/// Any `Fn(Invocation<I>) -> impl Future<Output = Result<Loaded<V>, E>>` is a loader.
///
/// # Examples
///
/// ```
/// use cachebatch::{Argument, Container, Invocation, Loaded, Loader};
///
/// let loader = |invocation: Invocation<u32>| async move {
///     let Some(Argument::Batch(ids)) = invocation.argument(0) else {
///         return Err("missing batch");
///     };
///     let values: Vec<String> = ids.iter().map(|id| format!("user-{id}")).collect();
///     Ok(Loaded::from(values))
/// };
///
/// # futures::executor::block_on(async {
/// let call = Invocation::new("users", "get", vec![Argument::Batch(Container::from(vec![1, 2]))]);
/// let loaded = loader.load(call).await.unwrap();
/// assert!(matches!(loaded, Loaded::Batch(values) if values.len() == 2));
/// # });
/// ```
pub trait Loader<I, V>: Send + Sync {
    /// Loads the values for the items carried by `invocation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the downstream source fails. The whole resolution fails with it.
    fn load(&self, invocation: Invocation<I>) -> impl Future<Output = Result<Loaded<V>, BoxError>> + Send;
}

impl<I, V, F, Fut, E> Loader<I, V> for F
where
    I: Send,
    F: Fn(Invocation<I>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Loaded<V>, E>> + Send,
    E: Into<BoxError>,
{
    async fn load(&self, invocation: Invocation<I>) -> Result<Loaded<V>, BoxError> {
        self(invocation).await.map_err(Into::into)
    }
}
