// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format-independent tree produced by a document parser.
//!
//! A property document is a root holding optional namespace declarations and a
//! list of property declarations. Values are kept in the lexical form the document
//! wrote them in. Every declaration field is optional at this level
//! so that a missing name or value is reported by the store build, which rejects the
//! whole document, rather than by the parser.

use crate::domain::qualified_name::NamespaceMap;
use serde::{Deserialize, Serialize};

/// A parsed property document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDocument {
    /// Namespace prefix declarations used by owner names and `QName` values
    #[serde(default)]
    pub namespaces: NamespaceMap,
    /// Property declarations in document order
    pub properties: Vec<PropertyDeclaration>,
}

/// A single property declaration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    /// The property name
    #[serde(default)]
    pub name: Option<String>,
    /// The declared type, such as `xs:integer`
    #[serde(rename = "as", default)]
    pub declared_type: Option<String>,
    /// The raw value
    #[serde(default)]
    pub value: Option<String>,
    /// The owning component, absent for global properties
    #[serde(
        alias = "processor-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub owner: Option<String>,
}

impl PropertyDeclaration {
    /// Creates a global declaration.
    pub fn global(name: &str, declared_type: &str, value: &str) -> Self {
        PropertyDeclaration {
            name: Some(name.to_string()),
            declared_type: Some(declared_type.to_string()),
            value: Some(value.to_string()),
            owner: None,
        }
    }

    /// Creates a declaration scoped to `owner`.
    pub fn owned(owner: &str, name: &str, declared_type: &str, value: &str) -> Self {
        PropertyDeclaration {
            owner: Some(owner.to_string()),
            ..Self::global(name, declared_type, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_declaration() {
        let declaration = PropertyDeclaration::global("cache.size", "xs:integer", "200");
        assert_eq!(declaration.name.as_deref(), Some("cache.size"));
        assert_eq!(declaration.owner, None);
    }

    #[test]
    fn test_owned_declaration() {
        let declaration =
            PropertyDeclaration::owned("oxf:page-flow", "mode", "xs:string", "redirect");
        assert_eq!(declaration.owner.as_deref(), Some("oxf:page-flow"));
        assert_eq!(declaration.value.as_deref(), Some("redirect"));
        assert_eq!(declaration.declared_type.as_deref(), Some("xs:string"));
    }

    #[test]
    fn test_default_document_is_empty() {
        let document = PropertyDocument::default();
        assert!(document.namespaces.is_empty());
        assert!(document.properties.is_empty());
    }
}
