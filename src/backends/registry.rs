//! Ordered, duplicate-free list of relay destinations.
//!
//! # Responsibilities
//! - Add and remove backend base URLs
//! - Hand out immutable point-in-time snapshots
//! - Keep writers serialized without blocking readers

use arc_swap::ArcSwap;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::RegistryError;

/// Immutable view of the backend list at one instant.
///
/// Later mutations of the registry never show up in a snapshot that was
/// already handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSnapshot(Arc<Vec<String>>);

impl BackendSnapshot {
    /// Space-joined rendering used by the admin endpoints.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl Deref for BackendSnapshot {
    type Target = [String];
    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

/// Registry of backend base URLs.
///
/// Every mutation builds a new list and swaps it in with a compare-and-swap
/// loop, so concurrent writers are linearized and a reader always observes
/// either the pre- or post-mutation list.
#[derive(Debug)]
pub struct BackendRegistry {
    current: ArcSwap<Vec<String>>,
}

impl BackendRegistry {
    /// Create a registry seeded with `initial`. Empty entries and repeats are dropped.
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut backends: Vec<String> = Vec::new();
        for backend in initial {
            let backend = backend.into();
            if backend.is_empty() || backends.contains(&backend) {
                tracing::warn!(backend = %backend, "Skipping empty or duplicate backend");
                continue;
            }
            backends.push(backend);
        }

        Self {
            current: ArcSwap::from_pointee(backends),
        }
    }

    /// Append `url` unless it is empty or already present.
    ///
    /// Returns the list as it stands right after this addition.
    pub fn add(&self, url: &str) -> Result<BackendSnapshot, RegistryError> {
        if url.is_empty() {
            return Err(RegistryError::MissingParameter);
        }

        let mut outcome = Err(RegistryError::AlreadyRegistered(url.to_string()));
        self.current.rcu(|current| {
            if current.iter().any(|b| b == url) {
                outcome = Err(RegistryError::AlreadyRegistered(url.to_string()));
                return Arc::clone(current);
            }
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(url.to_string());
            let next = Arc::new(next);
            outcome = Ok(BackendSnapshot(Arc::clone(&next)));
            next
        });

        if outcome.is_ok() {
            tracing::info!(backend = %url, "Backend registered");
        }
        outcome
    }

    /// Remove every entry equal to `url`. Removing an absent URL is a no-op.
    pub fn remove(&self, url: &str) -> Result<BackendSnapshot, RegistryError> {
        if url.is_empty() {
            return Err(RegistryError::MissingParameter);
        }

        let mut removed = false;
        let mut result = self.snapshot();
        self.current.rcu(|current| {
            if !current.iter().any(|b| b == url) {
                removed = false;
                result = BackendSnapshot(Arc::clone(current));
                return Arc::clone(current);
            }
            let next: Arc<Vec<String>> =
                Arc::new(current.iter().filter(|b| *b != url).cloned().collect());
            removed = true;
            result = BackendSnapshot(Arc::clone(&next));
            next
        });

        if removed {
            tracing::info!(backend = %url, "Backend unregistered");
        } else {
            tracing::debug!(backend = %url, "Unregister of unknown backend ignored");
        }
        Ok(result)
    }

    /// Point-in-time copy of the current list.
    pub fn snapshot(&self) -> BackendSnapshot {
        BackendSnapshot(self.current.load_full())
    }

    /// Read-only query; same contract as [`BackendRegistry::snapshot`].
    pub fn list(&self) -> BackendSnapshot {
        self.snapshot()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}
