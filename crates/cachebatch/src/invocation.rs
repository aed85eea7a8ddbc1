// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Explicit snapshots of intercepted method calls.

use std::hash::Hash;

use crate::container::{Container, DeclaredType};

/// One argument of an intercepted call.
///
/// Only the argument at the iterable position is interpreted by the resolver; every other
/// argument is passed through to the key expression and the loader unchanged.
#[derive(Clone, Debug)]
pub enum Argument<I> {
    /// An opaque non-batch value.
    Value(serde_json::Value),
    /// A single batch item, as seen by the key expression during lookup.
    Item(I),
    /// A batch of items.
    Batch(Container<I>),
    /// A position deliberately left empty for batch-level and write-mode evaluation.
    Omitted,
}

impl<I: Hash + Eq> PartialEq for Argument<I> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Item(a), Self::Item(b)) => a == b,
            (Self::Batch(a), Self::Batch(b)) => a == b,
            (Self::Omitted, Self::Omitted) => true,
            _ => false,
        }
    }
}

impl<I: Hash + Eq> Eq for Argument<I> {}

impl<I> From<serde_json::Value> for Argument<I> {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl<I> From<Container<I>> for Argument<I> {
    fn from(batch: Container<I>) -> Self {
        Self::Batch(batch)
    }
}

/// An immutable snapshot of one call: target identity, method name and arguments.
///
/// # Examples
///
/// ```
/// use cachebatch::{Argument, Container, Invocation};
///
/// let call = Invocation::new(
///     "UserRepository",
///     "find_by_ids",
///     vec![Argument::Batch(Container::from(vec![1_u64, 2, 3])), Argument::Value("eu".into())],
/// );
/// assert_eq!(call.method(), "find_by_ids");
/// assert_eq!(call.args().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Invocation<I> {
    target: String,
    method: String,
    args: Vec<Argument<I>>,
}

impl<I> Invocation<I> {
    /// Creates a new invocation.
    #[must_use]
    pub fn new(target: impl Into<String>, method: impl Into<String>, args: Vec<Argument<I>>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            args,
        }
    }

    /// Returns the identity of the call target.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns a view over the arguments.
    #[must_use]
    pub fn args(&self) -> Args<'_, I> {
        Args {
            args: &self.args,
            substitution: None,
        }
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&Argument<I>> {
        self.args.get(index)
    }

    /// Consumes the invocation, returning its arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Argument<I>> {
        self.args
    }

    /// Returns a copy of this invocation with `argument` moved in at `index`.
    ///
    /// Only the other arguments are cloned. An out-of-range `index` leaves the arguments as they are.
    pub(crate) fn with_argument(&self, index: usize, argument: Argument<I>) -> Self
    where
        I: Clone,
    {
        let mut argument = Some(argument);
        let args = self
            .args
            .iter()
            .enumerate()
            .map(|(position, current)| match argument.take_if(|_| position == index) {
                Some(replacement) => replacement,
                None => current.clone(),
            })
            .collect();

        Self {
            target: self.target.clone(),
            method: self.method.clone(),
            args,
        }
    }
}

impl<I: Hash + Eq> PartialEq for Invocation<I> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.method == other.method && self.args == other.args
    }
}

impl<I: Hash + Eq> Eq for Invocation<I> {}

/// A borrowed reference to one argument, as seen by an expression evaluator.
#[derive(Debug)]
pub enum ArgRef<'a, I> {
    /// An opaque non-batch value.
    Value(&'a serde_json::Value),
    /// A single batch item.
    Item(&'a I),
    /// A batch of items.
    Batch(&'a Container<I>),
    /// A position left empty.
    Omitted,
}

impl<I> Clone for ArgRef<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for ArgRef<'_, I> {}

impl<'a, I> From<&'a Argument<I>> for ArgRef<'a, I> {
    fn from(argument: &'a Argument<I>) -> Self {
        match argument {
            Argument::Value(value) => Self::Value(value),
            Argument::Item(item) => Self::Item(item),
            Argument::Batch(batch) => Self::Batch(batch),
            Argument::Omitted => Self::Omitted,
        }
    }
}

#[derive(Debug)]
enum Substitution<'a, I> {
    Item(&'a I),
    Omitted,
}

impl<I> Clone for Substitution<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Substitution<'_, I> {}

/// A view over the argument list of an invocation, with at most one position substituted.
///
/// Per-item key derivation sees the batch position replaced by the single item being
/// looked up; write-mode and batch-level evaluation see it as [`ArgRef::Omitted`]. No
/// argument is cloned to build the view.
#[derive(Debug)]
pub struct Args<'a, I> {
    args: &'a [Argument<I>],
    substitution: Option<(usize, Substitution<'a, I>)>,
}

impl<I> Clone for Args<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Args<'_, I> {}

impl<'a, I> Args<'a, I> {
    /// Creates a view over `args` with no substitution.
    #[must_use]
    pub fn new(args: &'a [Argument<I>]) -> Self {
        Self { args, substitution: None }
    }

    pub(crate) fn with_item(self, index: usize, item: &'a I) -> Self {
        Self {
            args: self.args,
            substitution: Some((index, Substitution::Item(item))),
        }
    }

    pub(crate) fn with_omitted(self, index: usize) -> Self {
        Self {
            args: self.args,
            substitution: Some((index, Substitution::Omitted)),
        }
    }

    /// Returns the argument at `index`, applying the substitution if it targets that position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ArgRef<'a, I>> {
        let argument = self.args.get(index)?;
        match self.substitution {
            Some((position, Substitution::Item(item))) if position == index => Some(ArgRef::Item(item)),
            Some((position, Substitution::Omitted)) if position == index => Some(ArgRef::Omitted),
            _ => Some(ArgRef::from(argument)),
        }
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterates the arguments in order, with the substitution applied.
    pub fn iter(&self) -> impl Iterator<Item = ArgRef<'a, I>> + use<'a, I> {
        let view = *self;
        (0..view.args.len()).filter_map(move |index| view.get(index))
    }
}

/// The declared shape of a cached method.
///
/// # Examples
///
/// ```
/// use cachebatch::{DeclaredType, MethodSignature};
///
/// let signature = MethodSignature::new(
///     "find_by_ids",
///     vec![DeclaredType::List, DeclaredType::Scalar("Region".into())],
///     DeclaredType::List,
/// );
/// assert_eq!(signature.params().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    params: Vec<DeclaredType>,
    returns: DeclaredType,
}

impl MethodSignature {
    /// Creates a new signature.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<DeclaredType>, returns: DeclaredType) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameter types in order.
    #[must_use]
    pub fn params(&self) -> &[DeclaredType] {
        &self.params
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn returns(&self) -> &DeclaredType {
        &self.returns
    }
}
