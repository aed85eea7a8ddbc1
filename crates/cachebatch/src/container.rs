// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Container families that can carry a batch of items or results.

use std::collections::{HashSet, LinkedList};
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{Error, ErrorKind};

/// The concrete family of a [`Container`].
///
/// Batch arguments and loader results are rebuilt in the same family they arrived in,
/// so an array argument yields an array miss set, an ordered set stays ordered, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// A fixed-length array.
    Array,
    /// A growable list.
    List,
    /// A doubly linked list.
    LinkedList,
    /// A set that preserves insertion order.
    OrderedSet,
    /// A hashed set with no defined iteration order.
    Set,
}

impl ContainerKind {
    /// Returns `true` if the family discards duplicate items.
    #[must_use]
    pub fn is_set(self) -> bool {
        matches!(self, Self::OrderedSet | Self::Set)
    }

    /// Returns `true` if a parameter declared as `self` can be passed a container of `actual`.
    ///
    /// A linked list stands in for a list and an ordered set for a set, in both directions.
    /// Arrays accept only arrays.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachebatch::ContainerKind;
    ///
    /// assert!(ContainerKind::List.accepts(ContainerKind::LinkedList));
    /// assert!(!ContainerKind::Array.accepts(ContainerKind::Set));
    /// ```
    #[must_use]
    pub fn accepts(self, actual: Self) -> bool {
        match self {
            Self::Array => actual == Self::Array,
            Self::List | Self::LinkedList => matches!(actual, Self::List | Self::LinkedList),
            Self::OrderedSet | Self::Set => actual.is_set(),
        }
    }

    /// Returns a short, stable name for the family.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::List => "list",
            Self::LinkedList => "linked_list",
            Self::OrderedSet => "ordered_set",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered or unordered collection of values tagged with its family.
///
/// # Examples
///
/// ```
/// use cachebatch::{Container, ContainerKind};
///
/// let ids = Container::from(vec![3, 1, 2]);
/// assert_eq!(ids.kind(), ContainerKind::List);
/// assert_eq!(ids.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
/// ```
#[derive(Clone, Debug)]
pub enum Container<T> {
    /// A fixed-length array.
    Array(Box<[T]>),
    /// A growable list.
    List(Vec<T>),
    /// A doubly linked list.
    LinkedList(LinkedList<T>),
    /// A set that preserves insertion order.
    OrderedSet(IndexSet<T>),
    /// A hashed set.
    Set(HashSet<T>),
}

impl<T> Container<T> {
    /// Returns the family of this container.
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Array(_) => ContainerKind::Array,
            Self::List(_) => ContainerKind::List,
            Self::LinkedList(_) => ContainerKind::LinkedList,
            Self::OrderedSet(_) => ContainerKind::OrderedSet,
            Self::Set(_) => ContainerKind::Set,
        }
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(values) => values.len(),
            Self::List(values) => values.len(),
            Self::LinkedList(values) => values.len(),
            Self::OrderedSet(values) => values.len(),
            Self::Set(values) => values.len(),
        }
    }

    /// Returns `true` if the container holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the values in the container's own order.
    ///
    /// For [`Container::Set`] the order is unspecified but stable for the lifetime of the
    /// container.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Self::Array(values) => Box::new(values.iter()),
            Self::List(values) => Box::new(values.iter()),
            Self::LinkedList(values) => Box::new(values.iter()),
            Self::OrderedSet(values) => Box::new(values.iter()),
            Self::Set(values) => Box::new(values.iter()),
        }
    }

    /// Consumes the container, yielding its values in iteration order.
    #[must_use]
    pub fn into_ordered_sequence(self) -> Vec<T> {
        match self {
            Self::Array(values) => values.into_vec(),
            Self::List(values) => values,
            Self::LinkedList(values) => values.into_iter().collect(),
            Self::OrderedSet(values) => values.into_iter().collect(),
            Self::Set(values) => values.into_iter().collect(),
        }
    }
}

impl<T: Hash + Eq> Container<T> {
    /// Builds a container of the given family from a sequence, in sequence order.
    ///
    /// `size_hint` pre-sizes the backing storage. Set families discard duplicates and keep
    /// the first occurrence.
    #[must_use]
    pub fn from_ordered_sequence(kind: ContainerKind, size_hint: usize, values: impl IntoIterator<Item = T>) -> Self {
        match kind {
            ContainerKind::Array => {
                let mut buffer = Vec::with_capacity(size_hint);
                buffer.extend(values);
                Self::Array(buffer.into_boxed_slice())
            }
            ContainerKind::List => {
                let mut buffer = Vec::with_capacity(size_hint);
                buffer.extend(values);
                Self::List(buffer)
            }
            ContainerKind::LinkedList => Self::LinkedList(values.into_iter().collect()),
            ContainerKind::OrderedSet => {
                let mut set = IndexSet::with_capacity(size_hint);
                set.extend(values);
                Self::OrderedSet(set)
            }
            ContainerKind::Set => {
                let mut set = HashSet::with_capacity(size_hint);
                set.extend(values);
                Self::Set(set)
            }
        }
    }

    /// Creates an empty container of the given family.
    #[must_use]
    pub fn empty(kind: ContainerKind) -> Self {
        Self::from_ordered_sequence(kind, 0, std::iter::empty())
    }
}

impl<T: Hash + Eq> PartialEq for Container<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::LinkedList(a), Self::LinkedList(b)) => a == b,
            (Self::OrderedSet(a), Self::OrderedSet(b)) => a.iter().eq(b.iter()),
            (Self::Set(a), Self::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Hash + Eq> Eq for Container<T> {}

impl<T> From<Vec<T>> for Container<T> {
    fn from(values: Vec<T>) -> Self {
        Self::List(values)
    }
}

impl<T> From<Box<[T]>> for Container<T> {
    fn from(values: Box<[T]>) -> Self {
        Self::Array(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Container<T> {
    fn from(values: [T; N]) -> Self {
        Self::Array(Box::new(values))
    }
}

impl<T> From<LinkedList<T>> for Container<T> {
    fn from(values: LinkedList<T>) -> Self {
        Self::LinkedList(values)
    }
}

impl<T> From<IndexSet<T>> for Container<T> {
    fn from(values: IndexSet<T>) -> Self {
        Self::OrderedSet(values)
    }
}

impl<T> From<HashSet<T>> for Container<T> {
    fn from(values: HashSet<T>) -> Self {
        Self::Set(values)
    }
}

/// A declared parameter or return type of a cached method.
///
/// Declared types are inspected once, when a resolver is built, to decide which
/// argument carries the batch and which family the loader must return.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A fixed-length array.
    Array,
    /// A growable list.
    List,
    /// A doubly linked list.
    LinkedList,
    /// A set that preserves insertion order.
    OrderedSet,
    /// A hashed set.
    Set,
    /// A collection family that cannot be rebuilt, identified by name.
    Collection(String),
    /// A non-collection type, identified by name.
    Scalar(String),
}

impl DeclaredType {
    /// Returns `true` if the type is a collection of any family.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

impl From<ContainerKind> for DeclaredType {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Array => Self::Array,
            ContainerKind::List => Self::List,
            ContainerKind::LinkedList => Self::LinkedList,
            ContainerKind::OrderedSet => Self::OrderedSet,
            ContainerKind::Set => Self::Set,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => f.write_str("array"),
            Self::List => f.write_str("list"),
            Self::LinkedList => f.write_str("linked_list"),
            Self::OrderedSet => f.write_str("ordered_set"),
            Self::Set => f.write_str("set"),
            Self::Collection(name) | Self::Scalar(name) => f.write_str(name),
        }
    }
}

impl TryFrom<&DeclaredType> for ContainerKind {
    type Error = Error;

    fn try_from(declared: &DeclaredType) -> Result<Self, Self::Error> {
        match declared {
            DeclaredType::Array => Ok(Self::Array),
            DeclaredType::List => Ok(Self::List),
            DeclaredType::LinkedList => Ok(Self::LinkedList),
            DeclaredType::OrderedSet => Ok(Self::OrderedSet),
            DeclaredType::Set => Ok(Self::Set),
            DeclaredType::Collection(name) => Err(Error::caused_by(
                ErrorKind::UnsupportedContainerKind,
                format!("collection type `{name}` cannot be rebuilt"),
            )),
            DeclaredType::Scalar(name) => Err(Error::configuration(format!("type `{name}` is not a collection"))),
        }
    }
}
