// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for batch resolvers.
//!
//! The builder collects the storage, the expression evaluator and the declared shape of
//! the cached method, then validates everything once in [`BatchResolverBuilder::build`].

use std::{marker::PhantomData, time::Duration};

#[cfg(feature = "memory")]
use cachebatch_memory::MemoryStore;
use cachebatch_store::CacheStore;
use tick::Clock;

use crate::{
    error::{Error, Result},
    expression::ExpressionEvaluator,
    invocation::MethodSignature,
    key::KeyBuilder,
    resolver::{BatchResolver, LookupFailurePolicy},
    telemetry::{BatchName, BatchTelemetry},
    ttl::TtlCalculator,
    validation::validate,
};

const DEFAULT_NAME: BatchName = "cachebatch";

/// Builder for a [`BatchResolver`].
///
/// Created by calling [`BatchResolver::builder`]. The store and the evaluator are set
/// through typed methods; everything else has a default except the method signature
/// and the key expression, which are checked by [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use cachebatch::{BatchResolver, DeclaredType, MethodSignature};
/// # use cachebatch::{Args, BoxError, ExpressionEvaluator};
/// # struct Keys;
/// # impl ExpressionEvaluator<u64, String> for Keys {
/// #     fn eval_key(&self, _: &str, _: &str, _: &str, _: Args<'_, u64>, _: Option<&String>) -> Result<String, BoxError> { Ok("k".into()) }
/// #     fn eval_field(&self, _: &str, _: Args<'_, u64>, _: Option<&String>) -> Result<String, BoxError> { Ok(String::new()) }
/// #     fn eval_expire(&self, _: &str, _: Args<'_, u64>, _: &String) -> Result<serde_json::Value, BoxError> { Ok(0.into()) }
/// # }
/// use std::time::Duration;
/// use tick::Clock;
///
/// let resolver = BatchResolver::builder::<u64, String>(Clock::new_frozen())
///     .memory()
///     .evaluator(Keys)
///     .method(MethodSignature::new("names", vec![DeclaredType::List], DeclaredType::List))
///     .key_expression("#id")
///     .expire(Duration::from_secs(300))
///     .build()?;
/// # let _ = resolver;
/// # Ok::<(), cachebatch::Error>(())
/// ```
#[derive(Debug)]
pub struct BatchResolverBuilder<I, V, S = (), E = ()> {
    clock: Clock,
    store: S,
    evaluator: E,
    signature: Option<MethodSignature>,
    namespace: Option<String>,
    key_expression: Option<String>,
    field_expression: Option<String>,
    iterable_arg_index: usize,
    expire: Duration,
    expire_expression: Option<String>,
    return_null_value: bool,
    lookup_failure: LookupFailurePolicy,
    telemetry: Option<BatchTelemetry>,
    name: BatchName,
    _phantom: PhantomData<fn() -> (I, V)>,
}

impl<I, V> BatchResolverBuilder<I, V> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            clock,
            store: (),
            evaluator: (),
            signature: None,
            namespace: None,
            key_expression: None,
            field_expression: None,
            iterable_arg_index: 0,
            expire: Duration::ZERO,
            expire_expression: None,
            return_null_value: false,
            lookup_failure: LookupFailurePolicy::default(),
            telemetry: None,
            name: DEFAULT_NAME,
            _phantom: PhantomData,
        }
    }
}

impl<I, V, E> BatchResolverBuilder<I, V, (), E> {
    /// Sets the cache store consulted and populated by the resolver.
    pub fn store<S>(self, store: S) -> BatchResolverBuilder<I, V, S, E>
    where
        S: CacheStore<V>,
    {
        self.with_parts(|(), evaluator| (store, evaluator))
    }

    /// Uses an unbounded in-memory store driven by the builder's clock.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachebatch::BatchResolver;
    /// use tick::Clock;
    ///
    /// let builder = BatchResolver::builder::<u64, String>(Clock::new_frozen()).memory();
    /// # let _ = builder;
    /// ```
    #[cfg(feature = "memory")]
    #[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
    #[must_use]
    pub fn memory(self) -> BatchResolverBuilder<I, V, MemoryStore<V>, E>
    where
        V: Clone + Send + Sync + 'static,
    {
        let store = MemoryStore::new(self.clock.clone());
        self.store(store)
    }
}

impl<I, V, S> BatchResolverBuilder<I, V, S, ()> {
    /// Sets the evaluator for key, field and expire expressions.
    pub fn evaluator<E>(self, evaluator: E) -> BatchResolverBuilder<I, V, S, E>
    where
        E: ExpressionEvaluator<I, V>,
    {
        self.with_parts(|store, ()| (store, evaluator))
    }
}

impl<I, V, S, E> BatchResolverBuilder<I, V, S, E> {
    fn with_parts<S2, E2>(self, parts: impl FnOnce(S, E) -> (S2, E2)) -> BatchResolverBuilder<I, V, S2, E2> {
        let (store, evaluator) = parts(self.store, self.evaluator);
        BatchResolverBuilder {
            clock: self.clock,
            store,
            evaluator,
            signature: self.signature,
            namespace: self.namespace,
            key_expression: self.key_expression,
            field_expression: self.field_expression,
            iterable_arg_index: self.iterable_arg_index,
            expire: self.expire,
            expire_expression: self.expire_expression,
            return_null_value: self.return_null_value,
            lookup_failure: self.lookup_failure,
            telemetry: self.telemetry,
            name: self.name,
            _phantom: PhantomData,
        }
    }

    /// Sets the declared signature of the cached method.
    #[must_use]
    pub fn method(mut self, signature: MethodSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Sets the expression that derives the base key of each item. Required.
    #[must_use]
    pub fn key_expression(mut self, expression: impl Into<String>) -> Self {
        self.key_expression = Some(expression.into());
        self
    }

    /// Sets the expression that derives a sub-field discriminator. Empty means none.
    #[must_use]
    pub fn field_expression(mut self, expression: impl Into<String>) -> Self {
        self.field_expression = Some(expression.into());
        self
    }

    /// Sets a namespace prepended to every key.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the position of the batch argument. Defaults to `0`.
    #[must_use]
    pub fn iterable_arg_index(mut self, index: usize) -> Self {
        self.iterable_arg_index = index;
        self
    }

    /// Sets the default expiration of written entries. Zero, the default, never expires.
    #[must_use]
    pub fn expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    /// Sets the expression computing a per-value expiration in seconds.
    ///
    /// When set and non-empty it replaces the default expiration for every written value.
    #[must_use]
    pub fn expire_expression(mut self, expression: impl Into<String>) -> Self {
        self.expire_expression = Some(expression.into());
        self
    }

    /// Emits an empty slot for every item that resolved to nothing. Defaults to `false`.
    #[must_use]
    pub fn return_null_value(mut self, enabled: bool) -> Self {
        self.return_null_value = enabled;
        self
    }

    /// Sets how a failed batched lookup is handled. Defaults to
    /// [`LookupFailurePolicy::TreatAsMiss`].
    #[must_use]
    pub fn lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_failure = policy;
        self
    }

    /// Sets the telemetry and the name identifying this resolver in its output.
    #[must_use]
    pub fn telemetry(mut self, telemetry: BatchTelemetry, name: BatchName) -> Self {
        self.telemetry = Some(telemetry);
        self.name = name;
        self
    }
}

impl<I, V, S, E> BatchResolverBuilder<I, V, S, E>
where
    S: CacheStore<V>,
    E: ExpressionEvaluator<I, V>,
{
    /// Validates the configuration and builds the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) if no method
    /// signature was set or the method is not eligible for batch resolution, and
    /// [`ErrorKind::UnsupportedContainerKind`](crate::ErrorKind::UnsupportedContainerKind)
    /// if a declared collection family cannot be rebuilt.
    pub fn build(self) -> Result<BatchResolver<I, V, S, E>> {
        let Some(signature) = self.signature else {
            return Err(Error::configuration("no method signature configured"));
        };
        let key_expression = self.key_expression.unwrap_or_default();
        let plan = validate(&signature, self.iterable_arg_index, &key_expression)?;

        tracing::debug!(
            batch.name = self.name,
            method = signature.name(),
            iterable_index = ?plan.iterable_index(),
            returns = %plan.returns(),
            "batch resolver configured"
        );

        Ok(BatchResolver::new(
            self.store,
            self.evaluator,
            plan,
            KeyBuilder::new(self.namespace, key_expression, self.field_expression),
            TtlCalculator::new(self.expire, self.expire_expression),
            self.return_null_value,
            self.lookup_failure,
            self.clock,
            self.telemetry,
            self.name,
        ))
    }
}
