// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed property values.
//!
//! This module provides `DeclaredType`, the type tag a property declaration carries,
//! and `TypedValue`, the converted value stored in a property set. Conversion happens
//! once, when a store is built, so lookups never re-parse raw strings.

use crate::domain::errors::{PropertyError, Result};
use crate::domain::qualified_name::{NamespaceMap, QualifiedName};
use std::fmt;
use std::str::FromStr;

const XML_SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The declared type of a property.
///
/// Type names follow XML Schema and may be written with or without an `xs:`
/// (or `xsd:`) prefix, or in Clark notation.
///
/// # Examples
///
/// ```
/// use propstore::domain::DeclaredType;
///
/// assert_eq!("xs:integer".parse::<DeclaredType>().unwrap(), DeclaredType::Integer);
/// assert_eq!("boolean".parse::<DeclaredType>().unwrap(), DeclaredType::Boolean);
/// assert!("xs:duration".parse::<DeclaredType>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// Arbitrary text, kept verbatim
    String,
    /// Signed 64-bit integer
    Integer,
    /// Integer greater than or equal to zero
    NonNegativeInteger,
    /// Integer greater than zero
    PositiveInteger,
    /// `true`/`false`/`1`/`0`
    Boolean,
    /// Double-precision float
    Double,
    /// Decimal number, held as a double
    Decimal,
    /// URI reference, whitespace-trimmed
    AnyUri,
    /// Qualified name resolved against the document's namespaces
    QName,
    /// Name without a colon
    NcName,
    /// Whitespace-separated list of tokens
    NmTokens,
}

impl DeclaredType {
    /// Returns the canonical `xs:` name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredType::String => "xs:string",
            DeclaredType::Integer => "xs:integer",
            DeclaredType::NonNegativeInteger => "xs:nonNegativeInteger",
            DeclaredType::PositiveInteger => "xs:positiveInteger",
            DeclaredType::Boolean => "xs:boolean",
            DeclaredType::Double => "xs:double",
            DeclaredType::Decimal => "xs:decimal",
            DeclaredType::AnyUri => "xs:anyURI",
            DeclaredType::QName => "xs:QName",
            DeclaredType::NcName => "xs:NCName",
            DeclaredType::NmTokens => "xs:NMTOKENS",
        }
    }
}

impl FromStr for DeclaredType {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let local = trimmed
            .strip_prefix("xs:")
            .or_else(|| trimmed.strip_prefix("xsd:"))
            .or_else(|| {
                trimmed
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_prefix(XML_SCHEMA_NAMESPACE))
                    .and_then(|rest| rest.strip_prefix('}'))
            })
            .unwrap_or(trimmed);

        match local {
            "string" => Ok(DeclaredType::String),
            "integer" => Ok(DeclaredType::Integer),
            "nonNegativeInteger" => Ok(DeclaredType::NonNegativeInteger),
            "positiveInteger" => Ok(DeclaredType::PositiveInteger),
            "boolean" => Ok(DeclaredType::Boolean),
            "double" => Ok(DeclaredType::Double),
            "decimal" => Ok(DeclaredType::Decimal),
            "anyURI" => Ok(DeclaredType::AnyUri),
            "QName" => Ok(DeclaredType::QName),
            "NCName" => Ok(DeclaredType::NcName),
            "NMTOKENS" => Ok(DeclaredType::NmTokens),
            _ => Err(PropertyError::malformed(format!(
                "Unrecognized declared type '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text (`string`, `NCName`)
    String(String),
    /// Any of the integer types
    Integer(i64),
    /// A boolean
    Boolean(bool),
    /// `double` or `decimal`
    Double(f64),
    /// An `anyURI`
    Uri(String),
    /// A resolved `QName`
    QName(QualifiedName),
    /// `NMTOKENS`
    Tokens(Vec<String>),
}

/// A single property value together with its declared type.
///
/// The raw lexical form is kept alongside the converted value so the original
/// text can be reported back.
///
/// # Examples
///
/// ```
/// use propstore::domain::{DeclaredType, NamespaceMap, TypedValue};
///
/// let value = TypedValue::parse("cache.size", "200", DeclaredType::Integer, &NamespaceMap::new())
///     .unwrap();
/// assert_eq!(value.as_i64(), Some(200));
/// assert_eq!(value.as_str(), None);
/// assert_eq!(value.raw(), "200");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    declared_type: DeclaredType,
    raw: String,
    value: Value,
}

impl TypedValue {
    /// Converts `raw` according to `declared_type`.
    ///
    /// `name` is only used for error reporting. `namespaces` resolves `QName` values.
    pub fn parse(
        name: &str,
        raw: &str,
        declared_type: DeclaredType,
        namespaces: &NamespaceMap,
    ) -> Result<Self> {
        let type_name = declared_type.as_str();
        let trimmed = raw.trim();

        let value = match declared_type {
            DeclaredType::String => Value::String(raw.to_string()),
            DeclaredType::Integer => Value::Integer(
                trimmed
                    .parse::<i64>()
                    .map_err(|e| PropertyError::from_parse_int_error(name, type_name, e))?,
            ),
            DeclaredType::NonNegativeInteger | DeclaredType::PositiveInteger => {
                let n = trimmed
                    .parse::<i64>()
                    .map_err(|e| PropertyError::from_parse_int_error(name, type_name, e))?;
                let minimum = if declared_type == DeclaredType::PositiveInteger { 1 } else { 0 };
                if n < minimum {
                    return Err(PropertyError::conversion(
                        name,
                        type_name,
                        format!("{} is below the minimum of {}", n, minimum),
                    ));
                }
                Value::Integer(n)
            }
            DeclaredType::Boolean => match trimmed {
                "true" | "1" => Value::Boolean(true),
                "false" | "0" => Value::Boolean(false),
                _ => {
                    return Err(PropertyError::conversion(
                        name,
                        type_name,
                        format!("'{}' is not one of true, false, 1, 0", trimmed),
                    ))
                }
            },
            DeclaredType::Double | DeclaredType::Decimal => Value::Double(
                trimmed
                    .parse::<f64>()
                    .map_err(|e| PropertyError::from_parse_float_error(name, type_name, e))?,
            ),
            DeclaredType::AnyUri => Value::Uri(trimmed.to_string()),
            DeclaredType::QName => Value::QName(
                QualifiedName::resolve(trimmed, namespaces)
                    .map_err(|e| PropertyError::conversion(name, type_name, e.to_string()))?,
            ),
            DeclaredType::NcName => {
                if !is_ncname(trimmed) {
                    return Err(PropertyError::conversion(
                        name,
                        type_name,
                        format!("'{}' is not a valid NCName", trimmed),
                    ));
                }
                Value::String(trimmed.to_string())
            }
            DeclaredType::NmTokens => {
                let tokens: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
                if tokens.is_empty() {
                    return Err(PropertyError::conversion(
                        name,
                        type_name,
                        "expected at least one token",
                    ));
                }
                Value::Tokens(tokens)
            }
        };

        Ok(TypedValue {
            declared_type,
            raw: raw.to_string(),
            value,
        })
    }

    /// Returns the declared type.
    pub fn declared_type(&self) -> DeclaredType {
        self.declared_type
    }

    /// Returns the raw lexical value as written in the document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the converted value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the text of a `string`, `NCName` or `anyURI` value.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) | Value::Uri(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value of any integer type.
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Returns a `double` or `decimal` value.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Returns a `QName` value.
    pub fn as_qname(&self) -> Option<&QualifiedName> {
        match &self.value {
            Value::QName(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the tokens of an `NMTOKENS` value.
    pub fn as_tokens(&self) -> Option<&[String]> {
        match &self.value {
            Value::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')),
        _ => false,
    }
}
