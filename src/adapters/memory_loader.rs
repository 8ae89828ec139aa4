// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory resource loader.

use crate::domain::{PropertyError, Result};
use crate::ports::{FetchedResource, ResourceLoader};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

/// Loader serving documents held in memory.
///
/// Useful for embedding a fixed document in a binary and for tests. Each
/// resource carries an explicit modification time so callers control what the
/// registry sees as a change.
///
/// # Examples
///
/// ```rust
/// use propstore::adapters::MemoryResourceLoader;
/// use propstore::ports::ResourceLoader;
/// use std::time::SystemTime;
///
/// let loader = MemoryResourceLoader::new();
/// loader.put("mem:properties", "properties: []", SystemTime::UNIX_EPOCH);
///
/// assert_eq!(loader.fetch_content("mem:properties").unwrap().content, "properties: []");
/// assert!(loader.fetch_content("mem:other").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryResourceLoader {
    resources: RwLock<HashMap<String, FetchedResource>>,
}

impl MemoryResourceLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a resource.
    pub fn put(&self, uri: impl Into<String>, content: impl Into<String>, last_modified: SystemTime) {
        let resource = FetchedResource {
            content: content.into(),
            last_modified,
        };
        match self.resources.write() {
            Ok(mut resources) => {
                resources.insert(uri.into(), resource);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(uri.into(), resource);
            }
        }
    }

    /// Removes a resource, so later fetches fail.
    pub fn remove(&self, uri: &str) {
        if let Ok(mut resources) = self.resources.write() {
            resources.remove(uri);
        }
    }

    fn lookup(&self, uri: &str) -> Result<FetchedResource> {
        let resources = self.resources.read().map_err(|_| {
            PropertyError::unavailable(uri, "Resource table lock poisoned", None)
        })?;
        resources
            .get(uri)
            .cloned()
            .ok_or_else(|| PropertyError::unavailable(uri, "No such resource", None))
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_metadata(&self, uri: &str) -> Result<SystemTime> {
        Ok(self.lookup(uri)?.last_modified)
    }

    fn fetch_content(&self, uri: &str) -> Result<FetchedResource> {
        self.lookup(uri)
    }
}
