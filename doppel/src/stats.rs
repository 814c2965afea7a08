use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters describing what a scheduler has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    /// Cycles that ran `acquire`, whatever the outcome.
    pub cycles: u64,
    pub published: u64,
    /// Cycles whose acquisition failed. The previous snapshot stayed current for each of these.
    pub failed: u64,
    /// Ticks and triggers skipped because a cycle was already in flight or pending.
    pub coalesced: u64,
    /// Snapshots dropped because they finished after stop was requested.
    pub discarded: u64,
}

#[derive(Default)]
pub(crate) struct CycleCounters {
    cycles: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
    coalesced: AtomicU64,
    discarded: AtomicU64,
}

impl CycleCounters {
    /// Called once a cycle's outcome has been fully applied. Pairs with the acquire load in
    /// [`snapshot`][Self::snapshot], so observing `cycles == n` means cycle `n`'s publish and
    /// counters are visible too.
    pub(crate) fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self, skipped: u64) {
        self.coalesced.fetch_add(skipped, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CycleStats {
        let cycles = self.cycles.load(Ordering::Acquire);
        CycleStats {
            cycles,
            published: self.published.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
