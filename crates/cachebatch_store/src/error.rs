// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store operations.

use std::fmt;

/// The store operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StoreOperation {
    /// A batched read.
    MultiGet,
    /// A batched write.
    MultiSet,
}

impl StoreOperation {
    /// Returns the operation name as used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultiGet => "multi_get",
            Self::MultiSet => "multi_set",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a store operation.
///
/// Records which [`StoreOperation`] failed and wraps the backend's cause, such as a
/// connection failure or a serialization problem. A cause that is itself an error is
/// available through [`std::error::Error::source()`].
///
/// # Example
///
/// ```
/// use cachebatch_store::{Error, StoreOperation};
///
/// let error = Error::during(StoreOperation::MultiGet, "connection refused");
/// assert_eq!(error.operation(), StoreOperation::MultiGet);
/// assert!(error.to_string().starts_with("store multi_get failed"));
/// ```
#[ohno::error]
#[display("store {operation} failed")]
pub struct Error {
    operation: StoreOperation,
}

impl Error {
    /// Creates an error for a failed `operation` with the backend's `cause`.
    pub fn during(operation: StoreOperation, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(operation, cause)
    }

    /// Returns the operation that failed.
    #[must_use]
    pub fn operation(&self) -> StoreOperation {
        self.operation
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
