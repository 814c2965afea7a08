#![allow(dead_code)]

use std::{
    thread,
    time::{Duration, Instant},
};

/// Generous upper bound for anything the scheduler thread should get to "soon".
pub const PATIENCE: Duration = Duration::from_secs(10);

/// Polls `condition` until it holds, panicking after [`PATIENCE`].
pub fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + PATIENCE;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Payload whose fields are always written together. A reader seeing `left != right` would mean
/// it observed parts of two different snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub left: u64,
    pub right: u64,
    pub samples: Vec<u64>,
}

impl Reading {
    pub fn new(value: u64) -> Self {
        Self {
            left: value,
            right: value,
            samples: vec![value; 64],
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.left == self.right && self.samples.iter().all(|sample| *sample == self.left)
    }
}
