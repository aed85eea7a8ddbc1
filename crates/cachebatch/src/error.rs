// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for batch resolution.

use std::fmt;

/// A boxed error produced by a collaborator such as a [`Loader`](crate::Loader) or an
/// [`ExpressionEvaluator`](crate::ExpressionEvaluator).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The category of a batch resolution failure.
///
/// Every kind except [`ErrorKind::Configuration`] is raised while resolving a call and
/// propagates to the caller without partial results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The method was rejected at setup time.
    Configuration,
    /// The designated batch argument is missing or is not a container.
    InvalidBatchArgument,
    /// The batch argument holds no items.
    EmptyBatch,
    /// A declared container family cannot be rebuilt.
    UnsupportedContainerKind,
    /// The loader returned a shape incompatible with the declared return kind.
    InvalidLoaderResult,
    /// A key, field or expire expression failed to evaluate.
    ExpressionEvaluation,
    /// The cache store could not serve the batched lookup.
    CacheUnavailable,
    /// The downstream loader failed.
    LoaderFailed,
}

impl ErrorKind {
    /// Returns a short, stable name for the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration error",
            Self::InvalidBatchArgument => "invalid batch argument",
            Self::EmptyBatch => "empty batch",
            Self::UnsupportedContainerKind => "unsupported container kind",
            Self::InvalidLoaderResult => "invalid loader result",
            Self::ExpressionEvaluation => "expression evaluation error",
            Self::CacheUnavailable => "cache unavailable",
            Self::LoaderFailed => "loader failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from configuring or running a batch resolver.
///
/// Use [`Error::kind`] to branch on the failure category; the underlying cause, if any,
/// is available through [`std::error::Error::source`].
///
/// # Examples
///
/// ```
/// use cachebatch::{Container, ErrorKind};
///
/// let empty = Container::<u32>::List(Vec::new());
/// assert!(empty.is_empty());
/// assert_eq!(ErrorKind::EmptyBatch.to_string(), "empty batch");
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::caused_by(ErrorKind::Configuration, message.into())
    }

    pub(crate) fn expression(cause: impl Into<BoxError>) -> Self {
        Self::caused_by(ErrorKind::ExpressionEvaluation, cause)
    }
}

/// A specialized [`Result`] type for batch resolution.
pub type Result<T> = std::result::Result<T, Error>;
