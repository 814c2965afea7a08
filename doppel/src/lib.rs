//! [![github]](https://github.com/LittleBoxOfSunshine/doppel)&ensp;[![crates-io]](https://crates.io/crates/doppel)&ensp;[![docs-rs]](https://docs.rs/doppel)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [docs-rs]: https://img.shields.io/badge/docs.rs-66c2a5?style=for-the-badge&labelColor=555555&logo=docs.rs
//!
//! <br>
//!
//! Doppel implements the double-buffered snapshot pattern: a background thread periodically builds
//! a complete, immutable [`Snapshot`] of some slow-to-read source (a sensor network, a remote
//! inventory, a directory scan) and swaps it in atomically, while any number of readers fetch the
//! latest complete snapshot without ever waiting on the scan.
//!
//! - Snapshots are built entirely off to the side. Readers never see one half-built.
//! - Publishing exchanges a single `Arc`, regardless of how large the snapshot is.
//! - Readers keep whatever snapshot they fetched for as long as they need it. Newer publishes
//!   don't change it, and it's freed once the last reader lets go.
//! - A failed scan skips publication for that cycle. The previous snapshot stays current
//!   (stale-but-valid beats unavailable).
//!
//! # Concepts, Usage, and Examples
//!
//! See the module documentation for each concept:
//!
//! - Publishing and reading snapshots: [`publisher`]
//! - Periodic acquisition: [`scheduler`]
//! - Scheduler configuration: [`config`]
//! - Decoupling readers from the publisher: [`fetcher`]
//!
//! Acquirers, snapshots and the reader trait live in [`doppel_core`] and are re-exported here.

pub mod config;
pub mod fetcher;
pub mod publisher;
pub mod scheduler;
mod stats;

pub use doppel_core::{
    acquire::{acquirer_from_fn, Acquirer, AcquisitionError, BoxError, FnAcquirer},
    fetch::SnapshotFetcher,
    snapshot::Snapshot,
};
pub use stats::CycleStats;
