// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the property registry.
//!
//! The registry owns the refresh logic and is the entry point applications
//! use to look up properties.

pub mod registry;

// Re-export commonly used types
pub use registry::{
    FailureBackoff, PropertyRegistry, RegistryBuilder, DEFAULT_PROPERTIES_URI,
    DEFAULT_REFRESH_INTERVAL,
};
