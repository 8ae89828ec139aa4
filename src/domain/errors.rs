// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the property registry.
//!
//! This module defines the errors that can occur while fetching, parsing, and
//! resolving property documents. All errors use `thiserror` for proper error
//! handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for property registry operations.
///
/// # Examples
///
/// ```
/// use propstore::domain::errors::PropertyError;
///
/// let error = PropertyError::malformed("property declaration is missing a name");
/// assert!(error.is_load_failure());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertyError {
    /// The resource holding the property document could not be fetched.
    #[error("Resource '{uri}' unavailable: {message}")]
    ResourceUnavailable {
        /// The resource location
        uri: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The property document is empty, unparsable, or holds an invalid declaration.
    #[error("Malformed property document: {message}")]
    MalformedDocument {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No property store has ever been loaded successfully.
    #[error("Configuration unavailable: {message}")]
    ConfigurationUnavailable {
        /// The error message
        message: String,
    },

    /// A raw property value does not conform to its declared type.
    #[error("Failed to convert property '{name}' to type {declared_type}: {source}")]
    TypeConversionError {
        /// The property being converted
        name: String,
        /// The declared type name
        declared_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O error occurred outside of a resource fetch.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PropertyError {
    /// Creates a `MalformedDocument` error without an underlying cause.
    pub fn malformed(message: impl Into<String>) -> Self {
        PropertyError::MalformedDocument {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ResourceUnavailable` error for the given resource.
    pub fn unavailable(
        uri: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PropertyError::ResourceUnavailable {
            uri: uri.into(),
            message: message.into(),
            source,
        }
    }

    /// Creates a `TypeConversionError` from a ParseIntError.
    pub fn from_parse_int_error(name: &str, declared_type: &str, err: ParseIntError) -> Self {
        PropertyError::TypeConversionError {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a `TypeConversionError` from a ParseFloatError.
    pub fn from_parse_float_error(name: &str, declared_type: &str, err: ParseFloatError) -> Self {
        PropertyError::TypeConversionError {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a `TypeConversionError` carrying only a message.
    pub fn conversion(name: &str, declared_type: &str, message: impl Into<String>) -> Self {
        let message: String = message.into();
        PropertyError::TypeConversionError {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            source: message.into(),
        }
    }

    /// Returns `true` for errors the registry recovers from by keeping the
    /// previous store and retrying on a later lookup.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            PropertyError::ResourceUnavailable { .. }
                | PropertyError::MalformedDocument { .. }
                | PropertyError::TypeConversionError { .. }
                | PropertyError::IoError(_)
        )
    }
}

/// A specialized Result type for property registry operations.
pub type Result<T> = std::result::Result<T, PropertyError>;
