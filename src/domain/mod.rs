// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the values, property sets, and stores the registry
//! publishes. It is independent of how documents are fetched or parsed.

pub mod document;
pub mod errors;
pub mod property_set;
pub mod property_store;
pub mod qualified_name;
pub mod typed_value;

// Re-export commonly used types
pub use document::{PropertyDeclaration, PropertyDocument};
pub use errors::{PropertyError, Result};
pub use property_set::PropertySet;
pub use property_store::PropertyStore;
pub use qualified_name::{NamespaceMap, QualifiedName};
pub use typed_value::{DeclaredType, TypedValue, Value};
