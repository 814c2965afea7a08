//! # Fetchers
//!
//! Code that only reads snapshots should depend on [`SnapshotFetcher`] rather than on
//! [`SnapshotPublisher`][crate::publisher::SnapshotPublisher] or the scheduler. Usually this is
//! done as an [`Arc`], in which case you can use the provided alias [`SharedSnapshotFetcher`] which
//! includes the necessary trait bounds.
//!
//! This keeps readers decoupled from how snapshots are produced: the same reader can be wired to a
//! live publisher in production and to a fixed snapshot in tests.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use doppel::fetcher::{into_shared_fetcher, shared_fetcher_from_static, SharedSnapshotFetcher};
//! # use doppel::publisher::SnapshotPublisher;
//! # use doppel::Snapshot;
//! fn hottest_sensor(readings: &SharedSnapshotFetcher<Vec<f32>>) -> Option<f32> {
//!     let snapshot = readings.current()?;
//!     snapshot.iter().copied().reduce(f32::max)
//! }
//!
//! let publisher = Arc::new(SnapshotPublisher::new());
//! let live = into_shared_fetcher(publisher.clone());
//! assert_eq!(None, hottest_sensor(&live));
//!
//! publisher.publish(Snapshot::new(1, vec![20.5, 31.0, 18.25]));
//! assert_eq!(Some(31.0), hottest_sensor(&live));
//!
//! let fixed = shared_fetcher_from_static(Snapshot::new(7, vec![1.0]));
//! assert_eq!(Some(1.0), hottest_sensor(&fixed));
//! ```

use std::{marker::PhantomData, sync::Arc};

use doppel_core::{fetch::SnapshotFetcher, snapshot::Snapshot};

/// A shared instance of a `SnapshotFetcher` that can be handed to readers on any thread.
pub type SharedSnapshotFetcher<T> = Arc<dyn SnapshotFetcher<T> + Send + Sync>;

/// Constructs a [`SharedSnapshotFetcher`] from a closure that returns the current snapshot.
pub fn shared_fetcher_from_fn<
    T: Send + Sync + 'static,
    F: Fn() -> Option<Arc<Snapshot<T>>> + Send + Sync + 'static,
>(
    fetcher: F,
) -> SharedSnapshotFetcher<T> {
    Arc::new(BoxedFetcher {
        inner: fetcher,
        phantom: PhantomData {},
    })
}

/// Constructs a [`SharedSnapshotFetcher`] that always returns the same snapshot.
pub fn shared_fetcher_from_static<T: Send + Sync + 'static>(
    snapshot: Snapshot<T>,
) -> SharedSnapshotFetcher<T> {
    let inner = Arc::new(snapshot);
    shared_fetcher_from_fn(move || Some(inner.clone()))
}

/// Converts an owned [`SnapshotFetcher`] into a [`SharedSnapshotFetcher`].
///
/// Passing an `Arc<SnapshotPublisher<T>>` keeps the publisher shared with its producer, so the
/// returned fetcher observes every later publish.
pub fn into_shared_fetcher<T: Send + Sync + 'static>(
    fetcher: impl SnapshotFetcher<T> + Send + Sync + 'static,
) -> SharedSnapshotFetcher<T> {
    let fetcher = Arc::new(fetcher);
    Arc::new(BoxedFetcher {
        inner: move || fetcher.current(),
        phantom: PhantomData {},
    })
}

struct BoxedFetcher<T, F: Fn() -> Option<Arc<Snapshot<T>>>> {
    inner: F,
    phantom: PhantomData<fn() -> T>,
}

impl<T, F: Fn() -> Option<Arc<Snapshot<T>>>> SnapshotFetcher<T> for BoxedFetcher<T, F> {
    fn current(&self) -> Option<Arc<Snapshot<T>>> {
        (self.inner)()
    }
}
