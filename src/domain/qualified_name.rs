// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qualified names identifying property owners.
//!
//! This module provides the `QualifiedName` type, a (namespace URI, local name) pair.
//! Equality and hashing use the full identity, never the lexical prefix a document
//! happened to use.

use crate::domain::errors::{PropertyError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mapping from namespace prefix to namespace URI, as declared by a property document.
pub type NamespaceMap = BTreeMap<String, String>;

/// A namespace-qualified name.
///
/// Owners are identified by a `QualifiedName`; `qname`-typed property values also
/// resolve to one. A name written `prefix:local` in a document is resolved against
/// that document's namespace declarations, and a name in Clark notation
/// (`{uri}local`) carries its namespace inline.
///
/// # Examples
///
/// ```
/// use propstore::domain::QualifiedName;
///
/// let name: QualifiedName = "{http://www.orbeon.com/oxf/processors}page-flow".parse().unwrap();
/// assert_eq!(name.namespace(), Some("http://www.orbeon.com/oxf/processors"));
/// assert_eq!(name.local_name(), "page-flow");
/// assert_eq!(
///     name,
///     QualifiedName::namespaced("http://www.orbeon.com/oxf/processors", "page-flow")
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: Option<String>,
    local_name: String,
}

impl QualifiedName {
    /// Creates a name in the given namespace.
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        QualifiedName {
            namespace: (!namespace.is_empty()).then_some(namespace),
            local_name: local_name.into(),
        }
    }

    /// Creates a name with no namespace.
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        QualifiedName {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Resolves a lexical name against a set of namespace declarations.
    ///
    /// Accepts `prefix:local`, `{uri}local`, or a bare `local` name. A prefix that
    /// is not declared in `namespaces` is a `MalformedDocument` error.
    ///
    /// # Examples
    ///
    /// ```
    /// use propstore::domain::{NamespaceMap, QualifiedName};
    ///
    /// let mut namespaces = NamespaceMap::new();
    /// namespaces.insert("oxf".to_string(), "http://www.orbeon.com/oxf/processors".to_string());
    ///
    /// let name = QualifiedName::resolve("oxf:page-flow", &namespaces).unwrap();
    /// assert_eq!(name.namespace(), Some("http://www.orbeon.com/oxf/processors"));
    /// assert!(QualifiedName::resolve("xf:model", &namespaces).is_err());
    /// ```
    pub fn resolve(lexical: &str, namespaces: &NamespaceMap) -> Result<Self> {
        let lexical = lexical.trim();

        if let Some(rest) = lexical.strip_prefix('{') {
            let (namespace, local_name) = rest.split_once('}').ok_or_else(|| {
                PropertyError::malformed(format!("Unterminated namespace in name '{}'", lexical))
            })?;
            return Self::checked(namespace, local_name, lexical);
        }

        match lexical.split_once(':') {
            Some((prefix, local_name)) => {
                let namespace = namespaces.get(prefix).ok_or_else(|| {
                    PropertyError::malformed(format!(
                        "Undeclared namespace prefix '{}' in name '{}'",
                        prefix, lexical
                    ))
                })?;
                Self::checked(namespace, local_name, lexical)
            }
            None => Self::checked("", lexical, lexical),
        }
    }

    fn checked(namespace: &str, local_name: &str, lexical: &str) -> Result<Self> {
        if local_name.is_empty()
            || local_name.contains(':')
            || local_name.chars().any(char::is_whitespace)
        {
            return Err(PropertyError::malformed(format!(
                "Invalid qualified name '{}'",
                lexical
            )));
        }
        Ok(Self::namespaced(namespace, local_name))
    }

    /// Returns the namespace URI, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl FromStr for QualifiedName {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s, &NamespaceMap::new())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const OXF: &str = "http://www.orbeon.com/oxf/processors";

    fn namespaces() -> NamespaceMap {
        let mut map = NamespaceMap::new();
        map.insert("oxf".to_string(), OXF.to_string());
        map.insert("p".to_string(), OXF.to_string());
        map
    }

    #[test]
    fn test_resolve_prefixed() {
        let name = QualifiedName::resolve("oxf:page-flow", &namespaces()).unwrap();
        assert_eq!(name.namespace(), Some(OXF));
        assert_eq!(name.local_name(), "page-flow");
    }

    #[test]
    fn test_identity_ignores_prefix() {
        let a = QualifiedName::resolve("oxf:page-flow", &namespaces()).unwrap();
        let b = QualifiedName::resolve("p:page-flow", &namespaces()).unwrap();
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, "value");
        assert_eq!(map.get(&b), Some(&"value"));
    }

    #[test]
    fn test_same_local_name_different_namespace() {
        let a = QualifiedName::namespaced(OXF, "page-flow");
        let b = QualifiedName::unqualified("page-flow");
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_clark_notation() {
        let name = QualifiedName::resolve(&format!("{{{}}}page-flow", OXF), &NamespaceMap::new())
            .unwrap();
        assert_eq!(name, QualifiedName::namespaced(OXF, "page-flow"));
    }

    #[test]
    fn test_resolve_unqualified() {
        let name = QualifiedName::resolve("  page-flow ", &NamespaceMap::new()).unwrap();
        assert_eq!(name.namespace(), None);
        assert_eq!(name.local_name(), "page-flow");
    }

    #[test]
    fn test_resolve_undeclared_prefix() {
        let result = QualifiedName::resolve("xf:model", &namespaces());
        assert!(matches!(
            result,
            Err(PropertyError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_resolve_invalid_names() {
        assert!(QualifiedName::resolve("", &namespaces()).is_err());
        assert!(QualifiedName::resolve("oxf:", &namespaces()).is_err());
        assert!(QualifiedName::resolve("{unterminated", &namespaces()).is_err());
        assert!(QualifiedName::resolve("two words", &namespaces()).is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let name = QualifiedName::namespaced(OXF, "page-flow");
        let parsed: QualifiedName = name.to_string().parse().unwrap();
        assert_eq!(parsed, name);

        let bare = QualifiedName::unqualified("local");
        assert_eq!(bare.to_string(), "local");
    }

    #[test]
    fn test_empty_namespace_is_none() {
        let name = QualifiedName::namespaced("", "local");
        assert_eq!(name, QualifiedName::unqualified("local"));
    }
}
