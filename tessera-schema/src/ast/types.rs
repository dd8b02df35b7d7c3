//! Shared building blocks for schema entities.

use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::Comparable;

/// A non-owning link from an entity to the prior version of itself.
///
/// Diff renderers set this when pairing an entity with the one it replaces.
/// It is never compared and never serialized.
pub struct Prior<T>(Option<Weak<T>>);

impl<T> Prior<T> {
    /// A link to nothing.
    pub fn none() -> Self {
        Self(None)
    }

    /// Link to a shared prior version.
    pub fn to(prior: &Arc<T>) -> Self {
        Self(Some(Arc::downgrade(prior)))
    }

    /// Get the prior version, if it is still alive.
    pub fn get(&self) -> Option<Arc<T>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Check whether a link was ever set.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Drop the link.
    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl<T> Default for Prior<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> Clone for Prior<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> fmt::Debug for Prior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(_) => f.write_str("Prior(live)"),
            None if self.is_set() => f.write_str("Prior(dropped)"),
            None => f.write_str("Prior(none)"),
        }
    }
}

/// A column, argument or return type descriptor.
///
/// Type names compare case-insensitively; everything else must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlType {
    /// Base type name (`INT`, `VARCHAR`, ...).
    pub name: SmolStr,
    /// Length, precision or enumeration values.
    #[serde(default)]
    pub params: Vec<SmolStr>,
    /// `UNSIGNED` modifier.
    #[serde(default)]
    pub unsigned: bool,
    /// Character set override.
    #[serde(default)]
    pub charset: Option<SmolStr>,
    /// Collation override.
    #[serde(default)]
    pub collate: Option<SmolStr>,
}

impl SqlType {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            unsigned: false,
            charset: None,
            collate: None,
        }
    }

    /// Add a length/precision parameter.
    pub fn param(mut self, param: impl Into<SmolStr>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Mark as unsigned.
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Set the character set.
    pub fn charset(mut self, charset: impl Into<SmolStr>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the collation.
    pub fn collate(mut self, collate: impl Into<SmolStr>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Render the type as it would appear in a column or argument definition.
    pub fn to_sql(&self) -> String {
        let mut sql = self.name.to_ascii_uppercase();
        if !self.params.is_empty() {
            sql.push('(');
            sql.push_str(&self.params.join(","));
            sql.push(')');
        }
        if self.unsigned {
            sql.push_str(" UNSIGNED");
        }
        if let Some(ref charset) = self.charset {
            sql.push_str(&format!(" CHARACTER SET {}", charset));
        }
        if let Some(ref collate) = self.collate {
            sql.push_str(&format!(" COLLATE {}", collate));
        }
        sql
    }
}

impl Comparable for SqlType {
    fn equal_to(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.params == other.params
            && self.unsigned == other.unsigned
            && self.charset == other.charset
            && self.collate == other.collate
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
