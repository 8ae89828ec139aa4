// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system resource loader.
//!
//! This module provides a loader that reads property documents from local files,
//! addressed either by plain path or by `file:` URI.

use crate::domain::{PropertyError, Result};
use crate::ports::{FetchedResource, ResourceLoader};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Maximum allowed size for property documents (10MB)
const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Name of the property document in the default location
const DEFAULT_FILE_NAME: &str = "properties.yaml";

/// Loader for property documents stored on the local file system.
///
/// Accepted URIs are `file:///absolute/path`, `file:relative/path`, and plain
/// paths. Relative paths resolve against the base directory, or the working
/// directory when none is set. Modification times come from file metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use propstore::adapters::FileResourceLoader;
/// use propstore::ports::ResourceLoader;
///
/// let loader = FileResourceLoader::new().with_base_dir("/etc/myapp");
/// let fetched = loader.fetch_content("file:properties.yaml").unwrap();
/// println!("{} bytes", fetched.content.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileResourceLoader {
    base_dir: Option<PathBuf>,
}

impl FileResourceLoader {
    /// Creates a loader resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Resolves relative paths against `base_dir` instead of the working directory.
    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(base_dir.as_ref().to_path_buf());
        self
    }

    /// Returns the `file:` URI of the property document in the OS-appropriate
    /// configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use propstore::adapters::FileResourceLoader;
    ///
    /// let uri = FileResourceLoader::default_uri("myapp", "com.example").unwrap();
    /// assert!(uri.starts_with("file:"));
    /// ```
    pub fn default_uri(app_name: &str, qualifier: &str) -> Result<String> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            PropertyError::ConfigurationUnavailable {
                message: "Failed to determine project directories".to_string(),
            }
        })?;

        Ok(format!(
            "file:{}",
            proj_dirs.config_dir().join(DEFAULT_FILE_NAME).display()
        ))
    }

    /// Maps a URI to a file system path.
    pub fn resolve(&self, uri: &str) -> Result<PathBuf> {
        let path = if let Some(rest) = uri.strip_prefix("file://") {
            PathBuf::from(rest)
        } else if let Some(rest) = uri.strip_prefix("file:") {
            PathBuf::from(rest)
        } else if uri.contains("://") {
            return Err(PropertyError::unavailable(
                uri,
                "Unsupported URI scheme for file loader",
                None,
            ));
        } else {
            PathBuf::from(uri)
        };

        if path.as_os_str().is_empty() {
            return Err(PropertyError::unavailable(uri, "Empty path", None));
        }

        Ok(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        })
    }

    fn metadata(uri: &str, path: &Path) -> Result<fs::Metadata> {
        fs::metadata(path).map_err(|e| {
            PropertyError::unavailable(
                uri,
                format!("Failed to read file metadata: {}", display_name(path)),
                Some(Box::new(e)),
            )
        })
    }

    fn modified(uri: &str, path: &Path, metadata: &fs::Metadata) -> Result<SystemTime> {
        metadata.modified().map_err(|e| {
            PropertyError::unavailable(
                uri,
                format!("Modification time unavailable: {}", display_name(path)),
                Some(Box::new(e)),
            )
        })
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

impl ResourceLoader for FileResourceLoader {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_metadata(&self, uri: &str) -> Result<SystemTime> {
        let path = self.resolve(uri)?;
        let metadata = Self::metadata(uri, &path)?;
        Self::modified(uri, &path, &metadata)
    }

    fn fetch_content(&self, uri: &str) -> Result<FetchedResource> {
        let path = self.resolve(uri)?;

        // Taken before reading so a write racing the read is seen as a later change
        let metadata = Self::metadata(uri, &path)?;
        let last_modified = Self::modified(uri, &path, &metadata)?;

        if metadata.len() > MAX_DOCUMENT_SIZE {
            return Err(PropertyError::unavailable(
                uri,
                format!(
                    "Property document too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_DOCUMENT_SIZE
                ),
                None,
            ));
        }

        let bytes = fs::read(&path).map_err(|e| {
            PropertyError::unavailable(
                uri,
                format!("Failed to read property document: {}", display_name(&path)),
                Some(Box::new(e)),
            )
        })?;

        let content = String::from_utf8(bytes).map_err(|e| PropertyError::MalformedDocument {
            message: format!("Property document is not valid UTF-8: {}", display_name(&path)),
            source: Some(Box::new(e)),
        })?;

        tracing::trace!(uri, bytes = content.len(), "Read property document");

        Ok(FetchedResource {
            content,
            last_modified,
        })
    }
}
