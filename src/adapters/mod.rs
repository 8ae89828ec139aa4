// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing loader and parser implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: loaders for the file system and for in-memory documents, and
//! the YAML document parser.

pub mod file_loader;
pub mod memory_loader;
#[cfg(feature = "yaml")]
pub mod yaml_document;

pub use file_loader::FileResourceLoader;
pub use memory_loader::MemoryResourceLoader;
#[cfg(feature = "yaml")]
pub use yaml_document::YamlDocumentParser;
