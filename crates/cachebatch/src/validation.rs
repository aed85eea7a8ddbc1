// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Setup-time validation of cached methods.

use crate::container::ContainerKind;
use crate::error::{Error, Result};
use crate::invocation::MethodSignature;

/// The validated shape of a batched method, resolved once before any call is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    iterable: Option<(usize, ContainerKind)>,
    returns: ContainerKind,
}

impl BatchPlan {
    /// Returns the position of the batch argument, or `None` for a method without parameters.
    #[must_use]
    pub fn iterable_index(&self) -> Option<usize> {
        self.iterable.map(|(index, _)| index)
    }

    /// Returns the declared family of the batch argument, or `None` for a method without
    /// parameters.
    #[must_use]
    pub fn iterable_kind(&self) -> Option<ContainerKind> {
        self.iterable.map(|(_, kind)| kind)
    }

    /// Returns the declared family of the result.
    #[must_use]
    pub fn returns(&self) -> ContainerKind {
        self.returns
    }
}

/// Validates a method for batch resolution.
///
/// # Errors
///
/// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) if the key expression is empty, the iterable index
/// is out of range for a method with parameters, the parameter at that index is not a
/// collection, or the return type is not a collection. Returns
/// [`ErrorKind::UnsupportedContainerKind`](crate::ErrorKind::UnsupportedContainerKind) if a declared collection family cannot be rebuilt.
///
/// # Examples
///
/// ```
/// use cachebatch::{ContainerKind, DeclaredType, MethodSignature, validate};
///
/// let signature = MethodSignature::new("find", vec![DeclaredType::Array], DeclaredType::List);
/// let plan = validate(&signature, 0, "#id")?;
/// assert_eq!(plan.iterable_kind(), Some(ContainerKind::Array));
/// assert_eq!(plan.returns(), ContainerKind::List);
/// # Ok::<(), cachebatch::Error>(())
/// ```
pub fn validate(signature: &MethodSignature, iterable_arg_index: usize, key_expression: &str) -> Result<BatchPlan> {
    if key_expression.trim().is_empty() {
        return Err(Error::configuration(format!(
            "method `{}` has an empty key expression",
            signature.name()
        )));
    }

    let iterable = if signature.params().is_empty() {
        None
    } else {
        let Some(declared) = signature.params().get(iterable_arg_index) else {
            return Err(Error::configuration(format!(
                "iterable argument index {iterable_arg_index} is out of range for method `{}` with {} parameters",
                signature.name(),
                signature.params().len()
            )));
        };

        if !declared.is_container() {
            return Err(Error::configuration(format!(
                "parameter {iterable_arg_index} of method `{}` has type `{declared}`, which is not a collection",
                signature.name()
            )));
        }

        Some((iterable_arg_index, ContainerKind::try_from(declared)?))
    };

    let returns = signature.returns();
    if !returns.is_container() {
        return Err(Error::configuration(format!(
            "method `{}` returns `{returns}`, which is not a collection",
            signature.name()
        )));
    }

    let returns = ContainerKind::try_from(returns)?;
    Ok(BatchPlan { iterable, returns })
}
