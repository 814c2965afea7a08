use std::{
    fmt,
    ops::Deref,
    time::{Duration, Instant},
};

/// The immutable result of one complete acquisition cycle.
///
/// A snapshot is built by exactly one owner and never changes afterwards. Once published it is
/// shared as an `Arc<Snapshot<T>>` between the publisher's slot and every reader that requested
/// it, and it is dropped when the last of those references is released. Readers holding a
/// superseded snapshot keep seeing exactly the data it was built with.
///
/// The payload is reachable through [`Deref`], so `snapshot.field` reads through to `T`.
pub struct Snapshot<T> {
    version: u64,
    acquired_at: Instant,
    payload: T,
}

impl<T> Snapshot<T> {
    /// Wraps a fully built payload, stamping it with the current instant.
    pub fn new(version: u64, payload: T) -> Self {
        Self::with_timestamp(version, Instant::now(), payload)
    }

    pub fn with_timestamp(version: u64, acquired_at: Instant, payload: T) -> Self {
        Self {
            version,
            acquired_at,
            payload,
        }
    }

    /// Identifies the acquisition that produced this snapshot. Snapshots built by the periodic
    /// scheduler carry the number of the cycle that built them.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// Time elapsed since the payload was acquired.
    pub fn age(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Recovers the payload of a snapshot that was never shared.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .field("age", &self.age())
            .field("payload", &self.payload)
            .finish()
    }
}
