use std::sync::Arc;

use crate::snapshot::Snapshot;

/// Fetches the most recently published snapshot as a shared reference. Implementors swap whole
/// snapshots behind an atomic pointer, so a fetch is a single reference-count increment and never
/// waits on whoever is building the next snapshot.
///
/// `None` means nothing has been published yet. That is an expected state, not an error, and every
/// caller has to decide what it means for them (skip work, serve a placeholder, etc).
///
/// Callers should fetch once per unit of work and keep the snapshot until that work is done:
///
/// - A polling thread fetches at the beginning of each iteration and keeps it for the full iteration.
/// - A request handler fetches when the request arrives and keeps it until the response is sent.
///
/// This gives every unit of work a consistent view even while newer snapshots are published.
pub trait SnapshotFetcher<T> {
    /// Get a shared copy of the latest published snapshot, if any.
    fn current(&self) -> Option<Arc<Snapshot<T>>>;
}

impl<T, F: SnapshotFetcher<T> + ?Sized> SnapshotFetcher<T> for Arc<F> {
    fn current(&self) -> Option<Arc<Snapshot<T>>> {
        (**self).current()
    }
}
