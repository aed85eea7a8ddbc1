// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use cachebatch_store::CacheEntry;

use crate::error::Error;
use crate::expression::ExpressionEvaluator;
use crate::invocation::Args;

/// Computes the expiration of loaded values.
#[derive(Clone, Debug)]
pub(crate) struct TtlCalculator {
    default_expire: Duration,
    expire_expression: Option<String>,
}

impl TtlCalculator {
    pub(crate) fn new(default_expire: Duration, expire_expression: Option<String>) -> Self {
        Self {
            default_expire,
            expire_expression: expire_expression.filter(|expr| !expr.is_empty()),
        }
    }

    /// Returns the expiration for `value`; zero means the entry never expires.
    pub(crate) fn compute_expiry<I, V, E>(&self, evaluator: &E, args: Args<'_, I>, value: &V) -> Result<Duration, Error>
    where
        E: ExpressionEvaluator<I, V>,
    {
        let Some(expression) = &self.expire_expression else {
            return Ok(self.default_expire);
        };

        let seconds = evaluator.eval_expire(expression, args, value).map_err(Error::expression)?;
        to_duration(expression, &seconds)
    }

    pub(crate) fn stage<V>(expiry: Duration, value: V) -> CacheEntry<V> {
        if expiry.is_zero() {
            CacheEntry::new(value)
        } else {
            CacheEntry::with_ttl(value, expiry)
        }
    }
}

fn to_duration(expression: &str, seconds: &serde_json::Value) -> Result<Duration, Error> {
    let invalid = || Error::expression(format!("expire expression `{expression}` produced `{seconds}`, expected non-negative seconds"));

    let serde_json::Value::Number(number) = seconds else {
        return Err(invalid());
    };

    if let Some(whole) = number.as_u64() {
        return Ok(Duration::from_secs(whole));
    }

    match number.as_f64() {
        Some(fractional) if fractional.is_finite() && fractional >= 0.0 => Duration::try_from_secs_f64(fractional).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
