// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource loader trait definition.
//!
//! This module defines the `ResourceLoader` trait, the port through which the
//! registry retrieves property documents and their modification times.

use crate::domain::Result;
use std::time::SystemTime;

/// The content of a fetched resource and the modification time it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedResource {
    /// The document text
    pub content: String,
    /// The modification time reported alongside the content
    pub last_modified: SystemTime,
}

/// A trait for retrieving property documents.
///
/// Implementations resolve a resource URI to its content. The registry probes
/// `fetch_metadata` on every staleness check and only calls `fetch_content` when
/// the resource appears to have changed, so the metadata probe should be cheap.
///
/// Any failure should be reported as `PropertyError::ResourceUnavailable`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; lookups on any thread may trigger a fetch.
///
/// # Examples
///
/// ```rust
/// use propstore::domain::Result;
/// use propstore::ports::{FetchedResource, ResourceLoader};
/// use std::time::SystemTime;
///
/// struct StaticLoader;
///
/// impl ResourceLoader for StaticLoader {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn fetch_metadata(&self, _uri: &str) -> Result<SystemTime> {
///         Ok(SystemTime::UNIX_EPOCH)
///     }
///
///     fn fetch_content(&self, _uri: &str) -> Result<FetchedResource> {
///         Ok(FetchedResource {
///             content: "properties: []".to_string(),
///             last_modified: SystemTime::UNIX_EPOCH,
///         })
///     }
/// }
///
/// let loader = StaticLoader;
/// assert_eq!(loader.fetch_metadata("any").unwrap(), SystemTime::UNIX_EPOCH);
/// ```
pub trait ResourceLoader: Send + Sync {
    /// Returns a short name for this loader, used in logs.
    fn name(&self) -> &str;

    /// Returns the current modification time of the resource without reading it.
    fn fetch_metadata(&self, uri: &str) -> Result<SystemTime>;

    /// Reads the full resource.
    fn fetch_content(&self, uri: &str) -> Result<FetchedResource>;
}
