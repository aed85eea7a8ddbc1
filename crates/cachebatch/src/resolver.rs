// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Batch cache-aside resolution.

use std::{collections::HashMap, hash::Hash, marker::PhantomData};

use cachebatch_store::{CacheEntry, CacheKey, CacheStore};
use indexmap::IndexMap;
use tick::Clock;

use crate::{
    builder::BatchResolverBuilder,
    container::{Container, ContainerKind},
    error::{Error, ErrorKind, Result},
    expression::ExpressionEvaluator,
    invocation::{Argument, Invocation},
    key::KeyBuilder,
    loader::{Loaded, Loader},
    telemetry::{
        BatchActivity, BatchName, BatchPhase, BatchTelemetry,
        ext::{BatchTelemetryExt, ClockExt},
    },
    ttl::TtlCalculator,
    validation::BatchPlan,
};

/// How a failed batched lookup is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LookupFailurePolicy {
    /// Treat every item as a miss and reload the whole batch through the loader.
    #[default]
    TreatAsMiss,
    /// Fail the call with [`ErrorKind::CacheUnavailable`].
    Abort,
}

type Hits<V> = HashMap<CacheKey, CacheEntry<V>>;
type Staged<V> = IndexMap<CacheKey, CacheEntry<V>>;

/// The flattened batch argument of one call.
struct ItemBatch<'a, I> {
    kind: ContainerKind,
    /// One key per input item, in input order.
    cache_keys: Vec<CacheKey>,
    /// Unique keys in first-seen order, each with the first item that produced it.
    items: IndexMap<CacheKey, &'a I>,
}

/// Resolves batched calls against a cache, loading only what is missing.
///
/// One resolution performs at most one batched lookup, one loader call and one batched
/// write. Hits and loaded values are merged back in input order and rebuilt in the
/// declared return family. Concurrent resolutions of overlapping batches are not
/// coordinated; the last write wins in the store.
///
/// # Examples
///
/// ```
/// use cachebatch::{Argument, BatchResolver, Container, DeclaredType, Invocation, Loaded, MethodSignature};
/// # use cachebatch::{ArgRef, Args, BoxError, ExpressionEvaluator};
/// # struct Keys;
/// # impl ExpressionEvaluator<u32, String> for Keys {
/// #     fn eval_key(&self, _: &str, _: &str, _: &str, args: Args<'_, u32>, value: Option<&String>) -> Result<String, BoxError> {
/// #         match (value, args.get(0)) {
/// #             (Some(value), _) => Ok(value.trim_start_matches("user-").to_string()),
/// #             (None, Some(ArgRef::Item(id))) => Ok(id.to_string()),
/// #             _ => Err("no key".into()),
/// #         }
/// #     }
/// #     fn eval_field(&self, _: &str, _: Args<'_, u32>, _: Option<&String>) -> Result<String, BoxError> { Ok(String::new()) }
/// #     fn eval_expire(&self, _: &str, _: Args<'_, u32>, _: &String) -> Result<serde_json::Value, BoxError> { Ok(0.into()) }
/// # }
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let resolver = BatchResolver::builder::<u32, String>(Clock::new_frozen())
///     .memory()
///     .evaluator(Keys)
///     .method(MethodSignature::new("users", vec![DeclaredType::List], DeclaredType::List))
///     .key_expression("#id")
///     .build()?;
///
/// let loader = |call: Invocation<u32>| async move {
///     let Some(Argument::Batch(ids)) = call.argument(0) else {
///         return Err("missing batch");
///     };
///     Ok(Loaded::from(ids.iter().map(|id| format!("user-{id}")).collect::<Vec<_>>()))
/// };
///
/// let call = Invocation::new("repo", "users", vec![Argument::Batch(Container::from(vec![2, 1]))]);
/// let users = resolver.resolve(call, &loader).await?;
/// assert_eq!(
///     users.into_ordered_sequence(),
///     vec![Some("user-2".to_string()), Some("user-1".to_string())]
/// );
/// # Ok::<(), cachebatch::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct BatchResolver<I, V, S, E> {
    store: S,
    evaluator: E,
    plan: BatchPlan,
    keys: KeyBuilder,
    ttl: TtlCalculator,
    return_null_value: bool,
    lookup_failure: LookupFailurePolicy,
    clock: Clock,
    telemetry: Option<BatchTelemetry>,
    name: BatchName,
    _phantom: PhantomData<fn() -> (I, V)>,
}

impl BatchResolver<(), (), (), ()> {
    /// Creates a new resolver builder.
    ///
    /// The clock times each phase and is handed to the in-memory store, if one is used.
    #[must_use]
    pub fn builder<I, V>(clock: Clock) -> BatchResolverBuilder<I, V> {
        BatchResolverBuilder::new(clock)
    }
}

impl<I, V, S, E> BatchResolver<I, V, S, E> {
    #[expect(clippy::too_many_arguments, reason = "constructed only by the builder")]
    pub(crate) fn new(
        store: S,
        evaluator: E,
        plan: BatchPlan,
        keys: KeyBuilder,
        ttl: TtlCalculator,
        return_null_value: bool,
        lookup_failure: LookupFailurePolicy,
        clock: Clock,
        telemetry: Option<BatchTelemetry>,
        name: BatchName,
    ) -> Self {
        Self {
            store,
            evaluator,
            plan,
            keys,
            ttl,
            return_null_value,
            lookup_failure,
            clock,
            telemetry,
            name,
            _phantom: PhantomData,
        }
    }

    /// Returns the validated shape of the cached method.
    #[must_use]
    pub fn plan(&self) -> BatchPlan {
        self.plan
    }

    /// Returns the name identifying this resolver in telemetry.
    #[must_use]
    pub fn name(&self) -> BatchName {
        self.name
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<I, V, S, E> BatchResolver<I, V, S, E>
where
    I: Clone + Eq + Hash + Send + Sync,
    V: Clone + Eq + Hash + Send + Sync,
    S: CacheStore<V>,
    E: ExpressionEvaluator<I, V>,
{
    /// Resolves one call.
    ///
    /// Items found in the cache are never passed to `loader`. The loader is called at most
    /// once, with the batch argument replaced by the missed items in the caller's container
    /// family. Freshly loaded values are written back before the merged result is returned.
    ///
    /// The result holds one slot per resolved item in input order, rebuilt in the declared
    /// return family. Items that resolved to nothing are skipped, or emitted as `None` when
    /// the resolver was built with `return_null_value(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error of kind:
    /// - [`ErrorKind::InvalidBatchArgument`] if the batch argument is missing, not a container, or
    ///   of a family the declared parameter does not accept,
    /// - [`ErrorKind::EmptyBatch`] if it holds no items,
    /// - [`ErrorKind::ExpressionEvaluation`] if a key, field or expire expression fails,
    /// - [`ErrorKind::CacheUnavailable`] if the lookup fails under [`LookupFailurePolicy::Abort`],
    /// - [`ErrorKind::LoaderFailed`] if the loader fails,
    /// - [`ErrorKind::InvalidLoaderResult`] if the loader result does not match the declared
    ///   return family.
    ///
    /// A failed write-back is logged and does not fail the call.
    pub async fn resolve<L>(&self, invocation: Invocation<I>, loader: &L) -> Result<Container<Option<V>>>
    where
        L: Loader<I, V>,
    {
        let stopwatch = self.clock.stopwatch();

        let result = match self.plan.iterable_index() {
            Some(index) => self.resolve_batch(&invocation, index, loader).await,
            None => self.resolve_direct(invocation, loader).await,
        };

        match &result {
            Ok(values) => self
                .telemetry
                .record(self.name, BatchPhase::Resolve, BatchActivity::Ok, values.len(), stopwatch.elapsed()),
            Err(error) => {
                tracing::debug!(batch.name = self.name, error = %error, "batch resolution failed");
                self.telemetry
                    .record(self.name, BatchPhase::Resolve, BatchActivity::Error, 0, stopwatch.elapsed());
            }
        }

        result
    }

    /// A method without parameters is not a batch: load, cache every element, return it.
    async fn resolve_direct<L>(&self, invocation: Invocation<I>, loader: &L) -> Result<Container<Option<V>>>
    where
        L: Loader<I, V>,
    {
        let loaded = self.load(invocation.clone(), 0, loader).await?;
        let Some(values) = self.check_shape(loaded)? else {
            return Ok(Container::empty(self.plan.returns()));
        };

        let values = values.into_ordered_sequence();
        let staged = self.stage(&invocation, None, values.iter())?;
        self.write_back(staged).await;

        Ok(Container::from_ordered_sequence(
            self.plan.returns(),
            values.len(),
            values.into_iter().map(Some),
        ))
    }

    async fn resolve_batch<L>(&self, invocation: &Invocation<I>, index: usize, loader: &L) -> Result<Container<Option<V>>>
    where
        L: Loader<I, V>,
    {
        let batch = self.flatten(invocation, index)?;
        let hits = self.lookup(&batch).await?;

        if batch.items.keys().all(|key| hits.contains_key(key)) {
            return Ok(self.merge(&batch, &hits, &Staged::new()));
        }

        let missed: Vec<&I> = batch
            .items
            .iter()
            .filter(|(key, _)| !hits.contains_key(*key))
            .map(|(_, item)| *item)
            .collect();
        let miss_count = missed.len();
        let misses = Container::from_ordered_sequence(batch.kind, miss_count, missed.into_iter().cloned());

        let loaded = self
            .load(invocation.with_argument(index, Argument::Batch(misses)), miss_count, loader)
            .await?;

        let staged = match self.check_shape(loaded)? {
            Some(values) => self.stage(invocation, Some(index), values.iter())?,
            None => Staged::new(),
        };

        let merged = self.merge(&batch, &hits, &staged);
        self.write_back(staged).await;
        Ok(merged)
    }

    fn flatten<'a>(&self, invocation: &'a Invocation<I>, index: usize) -> Result<ItemBatch<'a, I>> {
        let batch = match invocation.argument(index) {
            Some(Argument::Batch(batch)) => batch,
            Some(_) => {
                return Err(Error::caused_by(
                    ErrorKind::InvalidBatchArgument,
                    format!("argument {index} of `{}` is not a collection", invocation.method()),
                ));
            }
            None => {
                return Err(Error::caused_by(
                    ErrorKind::InvalidBatchArgument,
                    format!("`{}` was called without argument {index}", invocation.method()),
                ));
            }
        };

        if let Some(declared) = self.plan.iterable_kind()
            && !declared.accepts(batch.kind())
        {
            return Err(Error::caused_by(
                ErrorKind::InvalidBatchArgument,
                format!(
                    "argument {index} of `{}` is declared as {declared} but a {} was passed",
                    invocation.method(),
                    batch.kind()
                ),
            ));
        }

        if batch.is_empty() {
            return Err(Error::new(ErrorKind::EmptyBatch));
        }

        let mut cache_keys = Vec::with_capacity(batch.len());
        let mut items = IndexMap::with_capacity(batch.len());
        for item in batch.iter() {
            let key = self.keys.lookup_key::<I, V, E>(&self.evaluator, invocation, index, item)?;
            items.entry(key.clone()).or_insert(item);
            cache_keys.push(key);
        }

        Ok(ItemBatch {
            kind: batch.kind(),
            cache_keys,
            items,
        })
    }

    async fn lookup(&self, batch: &ItemBatch<'_, I>) -> Result<Hits<V>> {
        let keys: Vec<CacheKey> = batch.items.keys().cloned().collect();
        let timed = self.clock.timed_async(self.store.multi_get(&keys)).await;

        match timed.result {
            Ok(hits) => {
                let found = keys.iter().filter(|key| hits.contains_key(*key)).count();
                self.telemetry
                    .record(self.name, BatchPhase::Lookup, BatchActivity::Hit, found, timed.duration);
                self.telemetry
                    .record_count(self.name, BatchPhase::Lookup, BatchActivity::Miss, keys.len() - found);
                Ok(hits)
            }
            Err(error) => match self.lookup_failure {
                LookupFailurePolicy::TreatAsMiss => {
                    tracing::warn!(
                        batch.name = self.name,
                        keys = keys.len(),
                        error = %error,
                        "batched cache lookup failed, treating all keys as misses"
                    );
                    self.telemetry
                        .record(self.name, BatchPhase::Lookup, BatchActivity::Degraded, keys.len(), timed.duration);
                    Ok(Hits::new())
                }
                LookupFailurePolicy::Abort => {
                    self.telemetry
                        .record(self.name, BatchPhase::Lookup, BatchActivity::Error, keys.len(), timed.duration);
                    Err(Error::caused_by(ErrorKind::CacheUnavailable, error))
                }
            },
        }
    }

    async fn load<L>(&self, invocation: Invocation<I>, items: usize, loader: &L) -> Result<Loaded<V>>
    where
        L: Loader<I, V>,
    {
        let timed = self.clock.timed_async(loader.load(invocation)).await;

        match timed.result {
            Ok(loaded) => {
                let count = match &loaded {
                    Loaded::Batch(values) => values.len(),
                    Loaded::Single(_) => 1,
                    Loaded::Nothing => 0,
                };
                self.telemetry
                    .record(self.name, BatchPhase::Load, BatchActivity::Loaded, count, timed.duration);
                Ok(loaded)
            }
            Err(error) => {
                self.telemetry
                    .record(self.name, BatchPhase::Load, BatchActivity::Error, items, timed.duration);
                Err(Error::caused_by(ErrorKind::LoaderFailed, error))
            }
        }
    }

    /// Returns the loaded values if their family matches the declared return family.
    fn check_shape(&self, loaded: Loaded<V>) -> Result<Option<Container<V>>> {
        match loaded {
            Loaded::Nothing => Ok(None),
            Loaded::Single(_) => Err(Error::caused_by(
                ErrorKind::InvalidLoaderResult,
                format!("loader returned a single value, expected {}", self.plan.returns()),
            )),
            Loaded::Batch(values) if values.kind() != self.plan.returns() => Err(Error::caused_by(
                ErrorKind::InvalidLoaderResult,
                format!("loader returned {}, expected {}", values.kind(), self.plan.returns()),
            )),
            Loaded::Batch(values) => Ok(Some(values)),
        }
    }

    /// Keys every loaded value from the value itself; a later value for the same key
    /// replaces an earlier one but keeps its position.
    fn stage<'v>(&self, invocation: &Invocation<I>, index: Option<usize>, values: impl Iterator<Item = &'v V>) -> Result<Staged<V>>
    where
        V: 'v,
    {
        let args = match index {
            Some(index) => invocation.args().with_omitted(index),
            None => invocation.args(),
        };

        let mut staged = Staged::with_capacity(values.size_hint().0);
        for value in values {
            let key = self.keys.write_key(&self.evaluator, invocation, index, value)?;
            let expiry = self.ttl.compute_expiry(&self.evaluator, args, value)?;
            staged.insert(key, TtlCalculator::stage(expiry, value.clone()));
        }

        Ok(staged)
    }

    async fn write_back(&self, staged: Staged<V>) {
        if staged.is_empty() {
            return;
        }

        let count = staged.len();
        let timed = self.clock.timed_async(self.store.multi_set(staged.into_iter().collect())).await;

        match timed.result {
            Ok(()) => self
                .telemetry
                .record(self.name, BatchPhase::Writeback, BatchActivity::Written, count, timed.duration),
            Err(error) => {
                tracing::warn!(
                    batch.name = self.name,
                    entries = count,
                    error = %error,
                    "cache write-back failed, returning loaded values"
                );
                self.telemetry
                    .record(self.name, BatchPhase::Writeback, BatchActivity::Degraded, count, timed.duration);
            }
        }
    }

    fn merge(&self, batch: &ItemBatch<'_, I>, hits: &Hits<V>, staged: &Staged<V>) -> Container<Option<V>> {
        let log_keys = self.telemetry.logs_enabled();
        let size_hint = if self.return_null_value {
            batch.cache_keys.len()
        } else {
            hits.len() + staged.len()
        };

        let values = batch.cache_keys.iter().filter_map(|key| {
            let (value, source) = match (hits.get(key), staged.get(key)) {
                (Some(entry), _) => (Some(entry.value().clone()), "cache"),
                (None, Some(entry)) => (Some(entry.value().clone()), "loader"),
                (None, None) => (None, "absent"),
            };

            if log_keys {
                tracing::debug!(batch.name = self.name, key = %key, source, "batch.key");
            }

            match value {
                Some(value) => Some(Some(value)),
                None if self.return_null_value => Some(None),
                None => None,
            }
        });

        Container::from_ordered_sequence(self.plan.returns(), size_hint, values)
    }
}
