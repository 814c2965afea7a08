//! # Publisher
//!
//! [`SnapshotPublisher`] owns the single "published" slot that readers fetch from. The slot holds
//! an `Arc` to the latest complete [`Snapshot`], and the only thing ever exchanged is that pointer:
//!
//! - Builders construct the next snapshot entirely on their own, outside of the publisher.
//! - [`publish`][SnapshotPublisher::publish] swaps the finished snapshot in. The cost is the same
//!   no matter how large the payload is.
//! - [`current`][SnapshotPublisher::current] loads the pointer and bumps its reference count.
//!
//! Neither operation waits on acquisition, since nothing is ever held while a snapshot is being
//! built. The slot is an [`ArcSwapOption`], so on most hardware both sides are lock-free.
//!
//! Superseded snapshots are not freed by `publish`. They are released by reference counting once
//! the last reader holding one drops it, and until then they keep exactly the content they were
//! published with.
//!
//! ```rust
//! # use doppel::publisher::SnapshotPublisher;
//! # use doppel::Snapshot;
//! let publisher = SnapshotPublisher::new();
//! assert!(publisher.current().is_none());
//!
//! publisher.publish(Snapshot::new(1, "first scan"));
//! let held = publisher.current().unwrap();
//!
//! publisher.publish(Snapshot::new(2, "second scan"));
//! assert_eq!("second scan", **publisher.current().unwrap());
//! assert_eq!("first scan", **held);
//! ```

use std::{fmt, sync::Arc};

use arc_swap::ArcSwapOption;
use doppel_core::{fetch::SnapshotFetcher, snapshot::Snapshot};

/// A [`SnapshotPublisher`] shared between a producer and its readers.
pub type SharedPublisher<T> = Arc<SnapshotPublisher<T>>;

/// Holds the latest published [`Snapshot`] and hands out shared references to it.
///
/// Construct one explicitly and share it with `Arc`; there is no process wide instance. Dropping
/// the publisher drops its reference to the current snapshot, readers still holding it are
/// unaffected.
pub struct SnapshotPublisher<T> {
    slot: ArcSwapOption<Snapshot<T>>,
}

impl<T> SnapshotPublisher<T> {
    /// Creates a publisher with nothing published yet.
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Creates a publisher that already serves `snapshot`, e.g. a priming scan done at boot.
    pub fn with_initial(snapshot: Snapshot<T>) -> Self {
        Self {
            slot: ArcSwapOption::from_pointee(snapshot),
        }
    }

    /// Replaces the published snapshot. Only the reference is exchanged.
    ///
    /// If several producers publish concurrently the swaps are serialized and the last one wins.
    /// Readers see one of the snapshots in full, never a combination.
    pub fn publish(&self, snapshot: Snapshot<T>) {
        self.publish_arc(Arc::new(snapshot));
    }

    /// Like [`publish`][Self::publish], for a snapshot that is already shared.
    pub fn publish_arc(&self, snapshot: Arc<Snapshot<T>>) {
        self.slot.store(Some(snapshot));
    }

    /// Returns the latest published snapshot, or `None` if nothing has been published.
    pub fn current(&self) -> Option<Arc<Snapshot<T>>> {
        self.slot.load_full()
    }

    pub fn latest_version(&self) -> Option<u64> {
        let guard = self.slot.load();
        (*guard).as_ref().map(|snapshot| snapshot.version())
    }

    pub fn is_published(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl<T> Default for SnapshotPublisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotFetcher<T> for SnapshotPublisher<T> {
    fn current(&self) -> Option<Arc<Snapshot<T>>> {
        SnapshotPublisher::current(self)
    }
}

impl<T> fmt::Debug for SnapshotPublisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotPublisher")
            .field("latest_version", &self.latest_version())
            .finish()
    }
}
