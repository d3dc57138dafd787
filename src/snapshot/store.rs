//! Atomic holder for the current configuration snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::snapshot::model::ConfigSnapshot;

/// Holds the snapshot every read handler consults.
///
/// Readers get an `Arc` to an immutable snapshot and never wait on writers.
/// A reader that loaded a snapshot before a swap keeps a valid view of it
/// until it drops the `Arc`.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<ConfigSnapshot>,
}

impl SnapshotStore {
    /// Create a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(ConfigSnapshot::new())
    }

    pub fn with_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Most recently installed snapshot.
    pub fn load(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Replace the visible snapshot. Concurrent writers: last one wins.
    pub fn store(&self, snapshot: ConfigSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Derive the next snapshot from the current one and install it.
    ///
    /// `f` may run more than once if another writer swaps in between.
    /// Returns the snapshot that was installed.
    pub fn update<F>(&self, mut f: F) -> Arc<ConfigSnapshot>
    where
        F: FnMut(&ConfigSnapshot) -> ConfigSnapshot,
    {
        let mut installed = None;
        self.current.rcu(|current| {
            let next = Arc::new(f(current));
            installed = Some(Arc::clone(&next));
            next
        });
        installed.unwrap_or_else(|| self.load())
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
