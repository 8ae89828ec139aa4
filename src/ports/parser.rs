// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document parser trait definition.
//!
//! This module defines the `DocumentParser` trait, which turns raw document text
//! into the format-independent `PropertyDocument` tree.

use crate::domain::{PropertyDocument, Result};

/// A trait for parsing property documents.
///
/// Parsers only check that the document is well formed and has the expected
/// root shape. Validation of individual declarations happens when the store is
/// built. Any failure should be reported as `PropertyError::MalformedDocument`.
///
/// # Examples
///
/// ```rust
/// use propstore::domain::{PropertyDeclaration, PropertyDocument, Result};
/// use propstore::ports::DocumentParser;
///
/// /// One `name=value` string property per line.
/// struct LineParser;
///
/// impl DocumentParser for LineParser {
///     fn parse(&self, content: &str) -> Result<PropertyDocument> {
///         let properties = content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(name, value)| PropertyDeclaration::global(name, "xs:string", value))
///             .collect();
///         Ok(PropertyDocument { properties, ..Default::default() })
///     }
/// }
///
/// let document = LineParser.parse("a=1\nb=2").unwrap();
/// assert_eq!(document.properties.len(), 2);
/// ```
pub trait DocumentParser: Send + Sync {
    /// Parses document text into a property document.
    fn parse(&self, content: &str) -> Result<PropertyDocument>;
}
