// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits the registry depends on: fetching documents,
//! parsing them, and reading the time. Implementations live in the adapters layer.

pub mod clock;
pub mod loader;
pub mod parser;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use loader::{FetchedResource, ResourceLoader};
pub use parser::DocumentParser;
