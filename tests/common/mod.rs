// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities shared by the integration tests.
//!
//! Provides a loader that counts and scripts fetches, and a clock the tests
//! advance by hand.

use propstore::domain::{PropertyError, Result};
use propstore::ports::{Clock, FetchedResource, ResourceLoader};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// The URI the mock loader answers for.
#[allow(dead_code)]
pub const URI: &str = "mock:properties";

/// Routes registry logs to the test harness output. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Returns `secs` seconds after the Unix epoch.
#[allow(dead_code)]
pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// A mock loader serving one document and counting every call.
#[derive(Debug)]
pub struct CountingLoader {
    document: Mutex<(String, SystemTime)>,
    failing: AtomicBool,
    metadata_calls: AtomicUsize,
    content_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingLoader {
    /// Creates a loader serving `content`, last modified at `modified`.
    pub fn new(content: &str, modified: SystemTime) -> Self {
        Self {
            document: Mutex::new((content.to_string(), modified)),
            failing: AtomicBool::new(false),
            metadata_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the served document.
    pub fn update(&self, content: &str, modified: SystemTime) {
        *self.document.lock().unwrap() = (content.to_string(), modified);
    }

    /// Makes every fetch fail with `ResourceUnavailable` until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of metadata probes so far.
    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    /// Number of full fetches so far.
    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    fn check(&self, uri: &str) -> Result<()> {
        if uri != URI {
            return Err(PropertyError::unavailable(uri, "Unknown resource", None));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PropertyError::unavailable(uri, "Mock fetch failure", None));
        }
        Ok(())
    }
}

impl ResourceLoader for CountingLoader {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch_metadata(&self, uri: &str) -> Result<SystemTime> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.check(uri)?;
        Ok(self.document.lock().unwrap().1)
    }

    fn fetch_content(&self, uri: &str) -> Result<FetchedResource> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.check(uri)?;
        let (content, last_modified) = self.document.lock().unwrap().clone();
        Ok(FetchedResource {
            content,
            last_modified,
        })
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

#[allow(dead_code)]
impl ManualClock {
    /// Creates a clock reading `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}
