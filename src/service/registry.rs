// SPDX-License-Identifier: MIT OR Apache-2.0

//! The property registry and its refresh logic.
//!
//! The registry holds the current `PropertyStore` behind an atomically swapped
//! reference and re-checks the resource on lookups. Readers never take a lock:
//! each lookup loads one snapshot and answers from it. A refresh is performed
//! inline by whichever lookup finds the cache stale, and a mutex ensures only one
//! caller refreshes at a time. Callers that find a refresh already running are
//! served the current snapshot instead of waiting.

use crate::domain::{PropertyError, PropertySet, PropertyStore, QualifiedName, Result};
use crate::ports::{Clock, DocumentParser, FetchedResource, ResourceLoader, SystemClock};
use arc_swap::ArcSwapOption;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, SystemTime};

/// Resource location used when none is configured.
pub const DEFAULT_PROPERTIES_URI: &str = "file:properties.yaml";

/// Minimum time between two checks of the resource.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on any failure cooldown, about a century.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

const ENV_URI: &str = "PROPSTORE_URI";
const ENV_REFRESH_INTERVAL_MS: &str = "PROPSTORE_REFRESH_INTERVAL_MS";
const ENV_FETCH_TIMEOUT_MS: &str = "PROPSTORE_FETCH_TIMEOUT_MS";

/// Exponential cooldown applied after failed loads.
///
/// The first failure delays the next attempt by `initial`; each further
/// consecutive failure doubles the delay, up to `max`. Delays are capped at
/// roughly a hundred years whatever `max` says.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FailureBackoff {
    /// Delay after the first failure
    pub initial: Duration,
    /// Upper bound on the delay
    pub max: Duration,
}

impl FailureBackoff {
    /// Returns the delay to apply after `failures` consecutive failures.
    pub fn delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << exponent)
            .map_or(self.max, |delay| delay.min(self.max))
            .min(MAX_RETRY_DELAY)
    }
}

/// Staleness bookkeeping, guarded by the refresh mutex.
#[derive(Debug)]
struct RefreshState {
    uri: String,
    /// When the resource was last found current, by reload or by metadata probe
    last_refresh: Option<SystemTime>,
    /// Modification time of the resource the current store was built from
    store_modified: Option<SystemTime>,
    consecutive_failures: u32,
    retry_after: Option<SystemTime>,
}

impl RefreshState {
    fn new(uri: String) -> Self {
        RefreshState {
            uri,
            last_refresh: None,
            store_modified: None,
            consecutive_failures: 0,
            retry_after: None,
        }
    }

    fn reset(&mut self) {
        self.last_refresh = None;
        self.store_modified = None;
        self.consecutive_failures = 0;
        self.retry_after = None;
    }
}

/// Outcome of one refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Refresh {
    Unchanged,
    Reloaded,
}

/// A self-refreshing registry of typed properties.
///
/// The registry exposes a global property set and one property set per owner,
/// read from a single document. Every lookup runs a cheap staleness check: within
/// the refresh interval the cached store is served as is; after it, the
/// resource's modification time is probed and the document is only fetched and
/// parsed again when it has changed.
///
/// A failed load keeps the previous store and does not advance the refresh
/// timer, so the next lookup retries (unless a `FailureBackoff` is configured).
/// Lookups never fail because of a load problem; they return `None` when nothing
/// has ever loaded. `property_set_or_fail` is the exception.
///
/// Share a registry between threads by wrapping it in an `Arc`.
///
/// # Examples
///
/// ```rust
/// use propstore::adapters::MemoryResourceLoader;
/// use propstore::domain::QualifiedName;
/// use propstore::service::PropertyRegistry;
/// use std::sync::Arc;
/// use std::time::SystemTime;
///
/// # fn main() -> propstore::domain::Result<()> {
/// let loader = Arc::new(MemoryResourceLoader::new());
/// loader.put(
///     "mem:properties",
///     r#"
/// namespaces:
///   oxf: http://www.orbeon.com/oxf/processors
/// properties:
///   - { name: cache.size, as: "xs:integer", value: 200 }
///   - { name: mode, as: "xs:string", owner: "oxf:page-flow", value: redirect }
/// "#,
///     SystemTime::now(),
/// );
///
/// let registry = PropertyRegistry::builder().with_loader(loader).build()?;
/// registry.init("mem:properties")?;
///
/// let global = registry.global_property_set().unwrap();
/// assert_eq!(global.get_integer("cache.size")?, Some(200));
///
/// let page_flow = QualifiedName::namespaced("http://www.orbeon.com/oxf/processors", "page-flow");
/// let owned = registry.property_set(&page_flow).unwrap();
/// assert_eq!(owned.get_string("mode")?, Some("redirect"));
/// # Ok(())
/// # }
/// ```
pub struct PropertyRegistry {
    loader: Arc<dyn ResourceLoader>,
    parser: Arc<dyn DocumentParser>,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    fetch_timeout: Option<Duration>,
    failure_backoff: Option<FailureBackoff>,
    store: ArcSwapOption<PropertyStore>,
    state: Mutex<RefreshState>,
    /// Set while a timed fetch thread is running, including after its caller gave up
    fetch_in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the fetch thread ends, even by panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PropertyRegistry {
    /// Creates a new registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Points the registry at `uri` and loads it immediately.
    ///
    /// Calling `init` again repoints the registry; the next load always fetches
    /// the full document. On failure the previous store, if any, stays current and
    /// the error is returned.
    pub fn init(&self, uri: impl Into<String>) -> Result<()> {
        let uri = uri.into();
        let mut state = self.lock_state();
        tracing::info!(uri = %uri, "Initializing property registry");
        state.uri = uri;
        state.reset();
        self.refresh_locked(&mut state).map(|_| ())
    }

    /// Discards the current store and all staleness state.
    ///
    /// The next lookup reloads from scratch. Intended for tests and
    /// administrative resets.
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.reset();
        self.store.store(None);
        tracing::debug!(uri = %state.uri, "Property registry invalidated");
    }

    /// Returns the global property set, or `None` if no store has ever loaded.
    pub fn global_property_set(&self) -> Option<Arc<PropertySet>> {
        self.store()
            .map(|store| Arc::clone(store.global_property_set()))
    }

    /// Returns the global property set, failing if no store has ever loaded.
    pub fn property_set_or_fail(&self) -> Result<Arc<PropertySet>> {
        self.global_property_set()
            .ok_or_else(|| PropertyError::ConfigurationUnavailable {
                message: "No property store has been loaded".to_string(),
            })
    }

    /// Returns the property set of `owner`.
    ///
    /// `None` both when no store has loaded and when the owner declares no
    /// properties; use `is_loaded` to tell the two apart.
    pub fn property_set(&self, owner: &QualifiedName) -> Option<Arc<PropertySet>> {
        self.store()
            .and_then(|store| store.property_set(owner).cloned())
    }

    /// Returns the names of the global properties.
    pub fn keys(&self) -> Option<BTreeSet<String>> {
        self.global_property_set().map(|set| set.keys())
    }

    /// Runs the staleness check and returns the current store snapshot.
    pub fn store(&self) -> Option<Arc<PropertyStore>> {
        self.refresh();
        self.store.load_full()
    }

    /// Returns `true` if a store is currently published. Does not refresh.
    pub fn is_loaded(&self) -> bool {
        self.store.load().is_some()
    }

    /// Returns the configured resource location.
    pub fn uri(&self) -> String {
        self.lock_state().uri.clone()
    }

    /// Returns the minimum time between two resource checks.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn refresh(&self) {
        let mut state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::WouldBlock) => {
                tracing::trace!("Refresh already in progress, serving current store");
                return;
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        // Failures are logged and retried on a later lookup
        let _ = self.refresh_locked(&mut state);
    }

    fn refresh_locked(&self, state: &mut RefreshState) -> Result<Refresh> {
        let now = self.clock.now();

        if let Some(last) = state.last_refresh {
            if last
                .checked_add(self.refresh_interval)
                .map_or(true, |next| now < next)
            {
                return Ok(Refresh::Unchanged);
            }
        }
        if let Some(retry_after) = state.retry_after {
            if now < retry_after {
                tracing::trace!(uri = %state.uri, "Load failed recently, serving current store");
                return Ok(Refresh::Unchanged);
            }
        }

        match self.reload(state, now) {
            Ok(outcome) => {
                state.consecutive_failures = 0;
                state.retry_after = None;
                Ok(outcome)
            }
            Err(e) => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                if let Some(backoff) = self.failure_backoff {
                    state.retry_after =
                        now.checked_add(backoff.delay(state.consecutive_failures));
                }
                tracing::error!(
                    uri = %state.uri,
                    failures = state.consecutive_failures,
                    error = %e,
                    "Failed to load properties, keeping previous store"
                );
                Err(e)
            }
        }
    }

    fn reload(&self, state: &mut RefreshState, now: SystemTime) -> Result<Refresh> {
        if let Some(store_modified) = state.store_modified.filter(|_| self.is_loaded()) {
            let modified = self.with_timeout(&state.uri, |loader, uri| loader.fetch_metadata(uri))?;
            if modified <= store_modified {
                tracing::debug!(
                    uri = %state.uri,
                    "Not reloading properties because they have not changed"
                );
                state.last_refresh = Some(now);
                return Ok(Refresh::Unchanged);
            }
        }

        tracing::debug!(
            uri = %state.uri,
            loader = self.loader.name(),
            "Reloading properties because timestamp indicates they may have changed"
        );

        let fetched: FetchedResource =
            self.with_timeout(&state.uri, |loader, uri| loader.fetch_content(uri))?;
        if fetched.content.trim().is_empty() {
            return Err(PropertyError::malformed(format!(
                "Property document '{}' is empty",
                state.uri
            )));
        }

        let document = self.parser.parse(&fetched.content)?;
        let store = PropertyStore::from_document(&document)?;
        let owners = store.owners().count();
        let globals = store.global_property_set().len();

        self.store.store(Some(Arc::new(store)));
        state.last_refresh = Some(now);
        state.store_modified = Some(fetched.last_modified);

        tracing::info!(
            uri = %state.uri,
            global_properties = globals,
            owners,
            "Published new property store"
        );
        Ok(Refresh::Reloaded)
    }

    /// Runs a loader call, bounded by the fetch timeout when one is configured.
    ///
    /// At most one fetch thread exists at a time. While a fetch that already timed
    /// out is still running, further calls fail immediately.
    fn with_timeout<T, F>(&self, uri: &str, fetch: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ResourceLoader, &str) -> Result<T> + Send + 'static,
    {
        let Some(timeout) = self.fetch_timeout else {
            return fetch(self.loader.as_ref(), uri);
        };

        if self
            .fetch_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(uri = %uri, "Previous fetch still running, not starting another");
            return Err(PropertyError::unavailable(
                uri,
                "A previous fetch is still in progress",
                None,
            ));
        }
        let guard = InFlightGuard(Arc::clone(&self.fetch_in_flight));

        let loader = Arc::clone(&self.loader);
        let owned_uri = uri.to_string();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("propstore-fetch".to_string())
            .spawn(move || {
                let result = fetch(loader.as_ref(), &owned_uri);
                // Cleared before sending so the receiver's next fetch can start
                drop(guard);
                let _ = tx.send(result);
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(PropertyError::unavailable(
                uri,
                format!("Fetch timed out after {:?}", timeout),
                None,
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PropertyError::unavailable(
                uri,
                "Fetch thread terminated without a result",
                None,
            )),
        }
    }
}

impl std::fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("loader", &self.loader.name())
            .field("refresh_interval", &self.refresh_interval)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("failure_backoff", &self.failure_backoff)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Builder for constructing a `PropertyRegistry`.
///
/// Defaults: the `file:properties.yaml` resource, the file system loader, the
/// YAML parser, the system clock, a 5 second refresh interval, no fetch timeout,
/// and no failure backoff.
///
/// # Examples
///
/// ```rust
/// use propstore::service::PropertyRegistry;
/// use std::time::Duration;
///
/// # fn main() -> propstore::domain::Result<()> {
/// let registry = PropertyRegistry::builder()
///     .with_uri("file:/etc/myapp/properties.yaml")
///     .with_fetch_timeout(Duration::from_secs(2))
///     .build()?;
/// assert!(!registry.is_loaded());
/// # Ok(())
/// # }
/// ```
pub struct RegistryBuilder {
    uri: String,
    loader: Option<Arc<dyn ResourceLoader>>,
    parser: Option<Arc<dyn DocumentParser>>,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    fetch_timeout: Option<Duration>,
    failure_backoff: Option<FailureBackoff>,
}

impl RegistryBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            uri: DEFAULT_PROPERTIES_URI.to_string(),
            loader: None,
            parser: None,
            clock: Arc::new(SystemClock),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: None,
            failure_backoff: None,
        }
    }

    /// Sets the resource location read by the first lookup.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Sets the resource loader.
    pub fn with_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the document parser.
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the clock used for staleness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the minimum time between two resource checks.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Bounds each fetch; a fetch exceeding `timeout` counts as a load failure.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Delays retries after failed loads with an exponential cooldown.
    pub fn with_failure_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.failure_backoff = Some(FailureBackoff { initial, max });
        self
    }

    /// Applies overrides from the environment.
    ///
    /// Reads `PROPSTORE_URI`, `PROPSTORE_REFRESH_INTERVAL_MS` and
    /// `PROPSTORE_FETCH_TIMEOUT_MS`. Unset variables leave the current setting.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(uri) = std::env::var(ENV_URI) {
            if !uri.trim().is_empty() {
                self.uri = uri.trim().to_string();
            }
        }
        if let Some(interval) = env_millis(ENV_REFRESH_INTERVAL_MS)? {
            self.refresh_interval = interval;
        }
        if let Some(timeout) = env_millis(ENV_FETCH_TIMEOUT_MS)? {
            self.fetch_timeout = Some(timeout);
        }
        Ok(self)
    }

    /// Builds the registry. No resource is read until the first lookup or `init`.
    pub fn build(self) -> Result<PropertyRegistry> {
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(crate::adapters::FileResourceLoader::new()));
        let parser = match self.parser {
            Some(parser) => parser,
            None => default_parser()?,
        };

        Ok(PropertyRegistry {
            loader,
            parser,
            clock: self.clock,
            refresh_interval: self.refresh_interval,
            fetch_timeout: self.fetch_timeout,
            failure_backoff: self.failure_backoff,
            store: ArcSwapOption::empty(),
            state: Mutex::new(RefreshState::new(self.uri)),
            fetch_in_flight: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "yaml")]
fn default_parser() -> Result<Arc<dyn DocumentParser>> {
    Ok(Arc::new(crate::adapters::YamlDocumentParser::new()))
}

#[cfg(not(feature = "yaml"))]
fn default_parser() -> Result<Arc<dyn DocumentParser>> {
    Err(PropertyError::ConfigurationUnavailable {
        message: "No document parser configured".to_string(),
    })
}

fn env_millis(variable: &str) -> Result<Option<Duration>> {
    match std::env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| PropertyError::from_parse_int_error(variable, "milliseconds", e)),
        Err(_) => Ok(None),
    }
}
