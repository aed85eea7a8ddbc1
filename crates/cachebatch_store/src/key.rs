// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// Identifies one cached entry.
///
/// A key is made of an optional namespace, the base key produced by a key
/// expression, and an optional field used by hash-style stores that keep several
/// values under one base key. Two keys are equal exactly when all three parts are
/// equal, so logically identical requests always address the same entry.
///
/// # Examples
///
/// ```
/// use cachebatch_store::CacheKey;
///
/// let key = CacheKey::new("user:42").with_namespace("accounts").with_field("profile");
/// assert_eq!(key.key(), "user:42");
/// assert_eq!(key.namespace(), Some("accounts"));
/// assert_eq!(key.field(), Some("profile"));
/// assert_eq!(key.to_string(), "accounts:user:42#profile");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    namespace: Option<String>,
    key: String,
    field: Option<String>,
}

impl CacheKey {
    /// Creates a key without namespace or field.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            namespace: None,
            key: key.into(),
            field: None,
        }
    }

    /// Places the key under a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a field discriminator to the key.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the base key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the field discriminator, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the namespaced base key, without the field.
    ///
    /// This is the name a hash-style store would use for the outer entry.
    ///
    /// ```
    /// use cachebatch_store::CacheKey;
    ///
    /// let key = CacheKey::new("user:42").with_namespace("accounts").with_field("profile");
    /// assert_eq!(key.qualified_key(), "accounts:user:42");
    /// ```
    #[must_use]
    pub fn qualified_key(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}:{}", self.key),
            None => self.key.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}:")?;
        }
        f.write_str(&self.key)?;
        if let Some(field) = &self.field {
            write!(f, "#{field}")?;
        }
        Ok(())
    }
}
