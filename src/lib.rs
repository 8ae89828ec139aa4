// SPDX-License-Identifier: MIT OR Apache-2.0

//! A self-refreshing registry of typed configuration properties.
//!
//! Properties are read from a single structured document and partitioned into a
//! global scope and per-owner scopes, where an owner is a component identified by
//! a qualified name. The registry keeps the data fresh by periodically checking
//! the resource's modification time, re-parsing only when it has changed, and
//! publishing each new snapshot atomically so readers never see a torn state.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Values, property sets, stores, and errors
//!   (`TypedValue`, `PropertySet`, `PropertyStore`, `PropertyError`)
//! - **Ports**: Trait definitions for the collaborators (`ResourceLoader`,
//!   `DocumentParser`, `Clock`)
//! - **Adapters**: File system and in-memory loaders, the YAML document parser
//! - **Service**: The `PropertyRegistry` and its refresh logic
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML document parser (default)
//! - `cli`: Build the `propstore` command-line tool (default)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use propstore::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let registry = PropertyRegistry::builder().build()?;
//! registry.init("file:/etc/myapp/properties.yaml")?;
//!
//! let properties = registry.property_set_or_fail()?;
//! let cache_size = properties.get_integer_or("oxf.cache.size", 100);
//! println!("cache size: {}", cache_size);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{FileResourceLoader, MemoryResourceLoader};
    pub use crate::domain::{
        DeclaredType, PropertyError, PropertySet, PropertyStore, QualifiedName, Result,
        TypedValue,
    };
    pub use crate::ports::{Clock, DocumentParser, ResourceLoader};
    pub use crate::service::{PropertyRegistry, RegistryBuilder};

    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlDocumentParser;
}
