#![forbid(unsafe_code)]

//! Key → watcher multimap with ordered fan-out.
//!
//! # Invariants
//!
//! 1. Watchers for a key run in insertion order.
//! 2. A key with no watchers has no entry; appending to an absent key
//!    creates a one-element sequence.
//! 3. No de-duplication: registering the same watcher twice runs it twice.
//! 4. Entries are only removed all at once, by [`DependencyRegistry::clear`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown key | `notify` for a key nothing bound | No-op, returns 0 |

use std::collections::HashMap;

/// Append-only mapping from data key to ordered watchers.
#[derive(Debug, Clone)]
pub struct DependencyRegistry<W> {
    deps: HashMap<String, Vec<W>>,
}

impl<W> Default for DependencyRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> DependencyRegistry<W> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deps: HashMap::new(),
        }
    }

    /// Append `watcher` to the sequence for `key`.
    pub fn add_dependency(&mut self, key: impl Into<String>, watcher: W) {
        self.deps.entry(key.into()).or_default().push(watcher);
    }

    /// Run every watcher for `key`, in insertion order, on the calling
    /// thread. Returns the number of watchers run; 0 for an unknown key.
    pub fn notify(&self, key: &str, mut run: impl FnMut(&W)) -> usize {
        let Some(watchers) = self.deps.get(key) else {
            return 0;
        };
        for watcher in watchers {
            run(watcher);
        }
        watchers.len()
    }

    /// Watchers registered for `key` (empty for an unknown key).
    #[must_use]
    pub fn watchers(&self, key: &str) -> &[W] {
        self.deps.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of watchers for `key`.
    #[must_use]
    pub fn binding_count(&self, key: &str) -> usize {
        self.watchers(key).len()
    }

    /// Whether any watcher is registered for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.deps.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    /// Whether no key has watchers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Total number of watchers across all keys.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deps.values().map(Vec::len).sum()
    }

    /// All keys with watchers (unordered).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.deps.keys().map(String::as_str)
    }

    /// Drop every watcher.
    pub fn clear(&mut self) {
        self.deps.clear();
    }
}
