// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The expression evaluation capability consumed by key and TTL derivation.

use crate::error::BoxError;
use crate::invocation::Args;

/// Evaluates the key, field and expire expressions configured on a cached method.
///
/// The resolver treats expressions as opaque strings and delegates their meaning to this
/// trait. Implementations must be deterministic: equal inputs produce equal outputs, since
/// the lookup key of an item and the write key of its loaded value have to coincide.
///
/// During lookup the evaluator sees the batch position replaced by a single item and no
/// value. During writeback it sees the batch position omitted and the loaded value.
///
/// # Examples
///
/// ```
/// use cachebatch::{ArgRef, Args, BoxError, ExpressionEvaluator};
///
/// /// Keys are the item itself on lookup and the value's id on write.
/// struct ById;
///
/// impl ExpressionEvaluator<u64, (u64, String)> for ById {
///     fn eval_key(
///         &self,
///         _expr: &str,
///         _target: &str,
///         _method: &str,
///         args: Args<'_, u64>,
///         value: Option<&(u64, String)>,
///     ) -> Result<String, BoxError> {
///         match (value, args.get(0)) {
///             (Some((id, _)), _) | (None, Some(ArgRef::Item(id))) => Ok(id.to_string()),
///             _ => Err("no id available".into()),
///         }
///     }
///
///     fn eval_field(&self, expr: &str, _args: Args<'_, u64>, _value: Option<&(u64, String)>) -> Result<String, BoxError> {
///         Ok(expr.to_string())
///     }
///
///     fn eval_expire(
///         &self,
///         _expr: &str,
///         _args: Args<'_, u64>,
///         _value: &(u64, String),
///     ) -> Result<serde_json::Value, BoxError> {
///         Ok(serde_json::json!(60))
///     }
/// }
/// ```
pub trait ExpressionEvaluator<I, V>: Send + Sync {
    /// Evaluates the key expression, producing the base cache key.
    ///
    /// `value` is `Some` only in write mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated against the inputs.
    fn eval_key(&self, expr: &str, target: &str, method: &str, args: Args<'_, I>, value: Option<&V>) -> Result<String, BoxError>;

    /// Evaluates the field expression, producing a sub-field discriminator.
    ///
    /// `value` is `Some` only in write mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated against the inputs.
    fn eval_field(&self, expr: &str, args: Args<'_, I>, value: Option<&V>) -> Result<String, BoxError>;

    /// Evaluates the expire expression for a loaded value.
    ///
    /// The result is expected to be a non-negative number of seconds; anything else is
    /// rejected by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated against the inputs.
    fn eval_expire(&self, expr: &str, args: Args<'_, I>, value: &V) -> Result<serde_json::Value, BoxError>;
}

impl<I, V, T> ExpressionEvaluator<I, V> for std::sync::Arc<T>
where
    T: ExpressionEvaluator<I, V> + ?Sized,
{
    fn eval_key(&self, expr: &str, target: &str, method: &str, args: Args<'_, I>, value: Option<&V>) -> Result<String, BoxError> {
        (**self).eval_key(expr, target, method, args, value)
    }

    fn eval_field(&self, expr: &str, args: Args<'_, I>, value: Option<&V>) -> Result<String, BoxError> {
        (**self).eval_field(expr, args, value)
    }

    fn eval_expire(&self, expr: &str, args: Args<'_, I>, value: &V) -> Result<serde_json::Value, BoxError> {
        (**self).eval_expire(expr, args, value)
    }
}
