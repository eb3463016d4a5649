//! Conditional requests backed by per-URL `ETag` validators.
//!
//! The cache remembers the last validator the server issued for each
//! request URL and replays it as `If-None-Match` on conditional calls.
//! Only validators are stored, never response bodies: a `304 Not Modified`
//! surfaces as [`Conditional::NotModified`] and the caller reuses whatever
//! it obtained last time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Outcome of a conditional request.
///
/// # Example
///
/// ```no_run
/// use certforge_rs::{Conditional, ProfileId};
///
/// # async fn example(client: certforge_rs::CertforgeClient) -> certforge_rs::Result<()> {
/// let profiles = client.profiles();
/// let mut latest = profiles.get(ProfileId::new(42)).await?;
///
/// // later: refetch only if the server has a newer version
/// match profiles.get_conditional(ProfileId::new(42)).await? {
///     Conditional::Fresh(profile) => latest = profile,
///     Conditional::NotModified => { /* keep `latest` */ }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conditional<T> {
    /// The server returned a fresh representation.
    Fresh(T),
    /// The server answered `304 Not Modified`; the previously obtained
    /// representation is still current.
    NotModified,
}

impl<T> Conditional<T> {
    /// Returns `true` for a `304 Not Modified` outcome.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Conditional::NotModified)
    }

    /// The fresh value, or `None` for a not-modified outcome.
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Conditional::Fresh(value) => Some(value),
            Conditional::NotModified => None,
        }
    }

    /// Map the fresh value, preserving a not-modified outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conditional<U> {
        match self {
            Conditional::Fresh(value) => Conditional::Fresh(f(value)),
            Conditional::NotModified => Conditional::NotModified,
        }
    }
}

/// Per-URL store of opaque `ETag` validator strings.
///
/// Keys are exact request URLs including the query string; no
/// canonicalization is performed, so URLs that differ in any byte are
/// distinct entries. Entries are overwritten by newer validators and never
/// expire.
pub(crate) struct ValidatorCache {
    enabled: bool,
    entries: Mutex<HashMap<String, String>>,
}

impl ValidatorCache {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    /// The stored validator for a URL; always `None` when disabled.
    pub(crate) fn get(&self, url: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.lock().get(url).cloned()
    }

    /// Store or overwrite the validator for a URL; a no-op when disabled.
    pub(crate) fn store(&self, url: &str, validator: &str) {
        if !self.enabled {
            return;
        }
        self.lock().insert(url.to_string(), validator.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // a panic while holding the guard poisons the lock; the map itself
        // stays consistent, so keep using it
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
