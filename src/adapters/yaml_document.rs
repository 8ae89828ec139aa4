// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML property document parser.

use crate::domain::{PropertyDocument, PropertyError, Result};
use crate::ports::DocumentParser;

/// YAML parser implementation.
///
/// Expects a mapping with a required `properties` sequence and an optional
/// `namespaces` mapping:
///
/// ```yaml
/// namespaces:
///   oxf: http://www.orbeon.com/oxf/processors
/// properties:
///   - { name: oxf.cache.size, as: "xs:integer", value: 200 }
///   - { name: instance-passing, as: "xs:string", owner: "oxf:page-flow", value: redirect }
/// ```
///
/// `processor-name` is accepted in place of `owner`.
///
/// # Examples
///
/// ```rust
/// use propstore::adapters::YamlDocumentParser;
/// use propstore::ports::DocumentParser;
///
/// let parser = YamlDocumentParser::new();
/// let document = parser
///     .parse("properties:\n  - { name: cache.size, as: 'xs:integer', value: 200 }")
///     .unwrap();
/// assert_eq!(document.properties[0].value.as_deref(), Some("200"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlDocumentParser;

impl YamlDocumentParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlDocumentParser
    }
}

impl DocumentParser for YamlDocumentParser {
    fn parse(&self, content: &str) -> Result<PropertyDocument> {
        if content.trim().is_empty() {
            return Err(PropertyError::malformed("Property document is empty"));
        }

        serde_yaml::from_str(content).map_err(|e| PropertyError::MalformedDocument {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }
}
