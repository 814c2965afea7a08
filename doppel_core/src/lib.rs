//! [![github]](https://github.com/LittleBoxOfSunshine/doppel)&ensp;[![crates-io]](https://crates.io/crates/doppel_core)&ensp;[![docs-rs]](https://docs.rs/doppel_core)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [docs-rs]: https://img.shields.io/badge/docs.rs-66c2a5?style=for-the-badge&labelColor=555555&logo=docs.rs
//!
//! <br>
//!
//! This is the collection of types and traits re-exported by [`doppel`](https://crates.io/crates/doppel).
//! Each `doppel` component can be used in isolation or replaced. Depending on this crate alone is
//! enough to write an [`Acquirer`][acquire::Acquirer], a reader against
//! [`SnapshotFetcher`][fetch::SnapshotFetcher], or an alternate publisher.

pub mod acquire;
pub mod fetch;
pub mod snapshot;
