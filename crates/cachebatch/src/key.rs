// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-item cache key derivation.

use cachebatch_store::CacheKey;

use crate::error::Error;
use crate::expression::ExpressionEvaluator;
use crate::invocation::{Args, Invocation};

/// Derives cache keys for items and loaded values.
///
/// Lookup keys are evaluated with the batch position replaced by one item and no value.
/// Write keys are evaluated with the batch position omitted and the loaded value visible.
/// A configured expression must yield the same key for an item and for the value loaded
/// for it.
#[derive(Clone, Debug)]
pub(crate) struct KeyBuilder {
    namespace: Option<String>,
    key_expression: String,
    field_expression: Option<String>,
}

impl KeyBuilder {
    pub(crate) fn new(namespace: Option<String>, key_expression: String, field_expression: Option<String>) -> Self {
        Self {
            namespace,
            key_expression,
            field_expression: field_expression.filter(|expr| !expr.is_empty()),
        }
    }

    pub(crate) fn lookup_key<I, V, E>(&self, evaluator: &E, invocation: &Invocation<I>, index: usize, item: &I) -> Result<CacheKey, Error>
    where
        E: ExpressionEvaluator<I, V>,
    {
        let args = invocation.args().with_item(index, item);
        self.build(evaluator, invocation, args, None)
    }

    pub(crate) fn write_key<I, V, E>(&self, evaluator: &E, invocation: &Invocation<I>, index: Option<usize>, value: &V) -> Result<CacheKey, Error>
    where
        E: ExpressionEvaluator<I, V>,
    {
        let args = match index {
            Some(index) => invocation.args().with_omitted(index),
            None => invocation.args(),
        };
        self.build(evaluator, invocation, args, Some(value))
    }

    fn build<I, V, E>(&self, evaluator: &E, invocation: &Invocation<I>, args: Args<'_, I>, value: Option<&V>) -> Result<CacheKey, Error>
    where
        E: ExpressionEvaluator<I, V>,
    {
        let key = evaluator
            .eval_key(&self.key_expression, invocation.target(), invocation.method(), args, value)
            .map_err(Error::expression)?;
        if key.is_empty() {
            return Err(Error::expression(format!(
                "key expression `{}` evaluated to an empty key",
                self.key_expression
            )));
        }

        let mut cache_key = CacheKey::new(key);
        if let Some(namespace) = &self.namespace {
            cache_key = cache_key.with_namespace(namespace.clone());
        }

        if let Some(field_expression) = &self.field_expression {
            let field = evaluator.eval_field(field_expression, args, value).map_err(Error::expression)?;
            cache_key = cache_key.with_field(field);
        }

        Ok(cache_key)
    }
}
