//! # Scheduler
//!
//! [`PeriodicScheduler`] drives an [`Acquirer`] on a fixed cadence and publishes every snapshot it
//! builds. Once [started][PeriodicScheduler::start] it runs on its own named thread, so neither the
//! caller nor any reader ever pays for a scan.
//!
//! Each cycle:
//!
//! 1. Calls [`Acquirer::acquire`] with nothing held. The scan can take as long as it needs.
//! 2. On success, stamps the payload with the cycle number and publishes it.
//! 3. On failure (or a panic inside the acquirer), reports the error, leaves the previously
//!    published snapshot in place and carries on with the next cycle.
//!
//! Cycles never overlap. When a scan overruns one or more ticks, those ticks are skipped rather
//! than queued, so at most one snapshot is ever being built. Skipped ticks are counted in
//! [`CycleStats::coalesced`].
//!
//! ```rust
//! # use std::{sync::Arc, time::Duration};
//! # use doppel::{acquirer_from_fn, AcquisitionError};
//! # use doppel::config::SchedulerConfig;
//! # use doppel::publisher::SnapshotPublisher;
//! # use doppel::scheduler::PeriodicScheduler;
//! let publisher = Arc::new(SnapshotPublisher::new());
//! let scan = acquirer_from_fn(|| Ok::<_, AcquisitionError>(vec![21.5_f32, 19.0]));
//!
//! let handle = PeriodicScheduler::new(
//!     SchedulerConfig::with_period(Duration::from_millis(50)),
//!     scan,
//!     publisher.clone(),
//! )
//! .unwrap()
//! .start()
//! .unwrap();
//!
//! // Readers only ever talk to the publisher.
//! while publisher.current().is_none() {
//!     std::thread::sleep(Duration::from_millis(1));
//! }
//!
//! let stats = handle.stop().unwrap();
//! assert!(stats.published >= 1);
//! ```
//!
//! ## Stopping
//!
//! [`SchedulerControl::request_stop`] only raises a flag, so it can be called from any thread at
//! any time. The scheduler starts no new cycle once it has seen the flag. A scan that is already
//! running is allowed to finish, and the configured [`StopPolicy`] decides whether its snapshot is
//! published or discarded. [`SchedulerHandle::stop`] (and dropping the handle) additionally waits
//! for the thread to exit.
//!
//! The publisher never depends on the scheduler being alive: readers keep getting the last
//! published snapshot after the scheduler has stopped.

use std::{
    any::Any,
    fmt, io,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use doppel_core::{
    acquire::{Acquirer, AcquisitionError},
    snapshot::Snapshot,
};
use tracing::{debug, info, warn};

use crate::{
    config::{ConfigError, SchedulerConfig, StopPolicy},
    publisher::SharedPublisher,
    stats::{CycleCounters, CycleStats},
};

/// Result of a single acquisition cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A new snapshot is current. Its version is the cycle number.
    Published { version: u64 },
    /// The acquirer failed; the previous snapshot is still current.
    Failed {
        cycle: u64,
        error: AcquisitionError,
    },
    /// The snapshot finished after stop was requested and was dropped per
    /// [`StopPolicy::DiscardOnStop`].
    Discarded { cycle: u64 },
}

impl CycleOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, CycleOutcome::Published { .. })
    }
}

/// Runs an [`Acquirer`] periodically and publishes its snapshots. See the [module docs][self].
pub struct PeriodicScheduler<A: Acquirer> {
    config: SchedulerConfig,
    acquirer: A,
    publisher: SharedPublisher<A::Output>,
    next_cycle: u64,
    counters: Arc<CycleCounters>,
}

impl<A: Acquirer> PeriodicScheduler<A> {
    pub fn new(
        config: SchedulerConfig,
        acquirer: A,
        publisher: SharedPublisher<A::Output>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            acquirer,
            publisher,
            next_cycle: 1,
            counters: Arc::new(CycleCounters::default()),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn publisher(&self) -> &SharedPublisher<A::Output> {
        &self.publisher
    }

    pub fn stats(&self) -> CycleStats {
        self.counters.snapshot()
    }

    /// Runs one cycle on the calling thread. Useful to prime the publisher before
    /// [`start`][Self::start], and to step a scheduler deterministically in tests.
    pub fn run_once(&mut self) -> CycleOutcome {
        self.run_cycle(None)
    }

    fn run_cycle(&mut self, stop: Option<&AtomicBool>) -> CycleOutcome {
        let cycle = self.next_cycle;
        self.next_cycle += 1;

        let acquirer = &mut self.acquirer;
        let result = panic::catch_unwind(AssertUnwindSafe(|| acquirer.acquire()))
            .unwrap_or_else(|payload| Err(AcquisitionError::Panicked(panic_message(&*payload))));

        let outcome = match result {
            Ok(payload) => {
                let snapshot = Snapshot::new(cycle, payload);
                let stopping = stop.is_some_and(|stop| stop.load(Ordering::Acquire));

                if stopping && self.config.stop_policy == StopPolicy::DiscardOnStop {
                    info!(cycle, "stop requested during acquisition, discarding snapshot");
                    self.counters.record_discarded();
                    CycleOutcome::Discarded { cycle }
                } else {
                    self.publisher.publish(snapshot);
                    self.counters.record_published();
                    debug!(version = cycle, "published snapshot");
                    CycleOutcome::Published { version: cycle }
                }
            }
            Err(error) => {
                warn!(cycle, error = %error, "acquisition failed, keeping previous snapshot");
                self.counters.record_failed();
                CycleOutcome::Failed { cycle, error }
            }
        };

        self.counters.record_cycle();
        outcome
    }
}

impl<A> PeriodicScheduler<A>
where
    A: Acquirer + Send + 'static,
    A::Output: Send + Sync + 'static,
{
    /// Moves the scheduler onto a dedicated thread and returns a handle to control it.
    pub fn start(self) -> Result<SchedulerHandle<A::Output>, SchedulerError> {
        // One slot: a pending trigger or wake-up. Anything beyond that is coalesced.
        let (signals, receiver) = channel::bounded(1);
        let shared = Arc::new(Shared {
            stop: AtomicBool::new(false),
            running: AtomicBool::new(true),
            counters: self.counters.clone(),
        });
        let publisher = self.publisher.clone();

        let thread_shared = shared.clone();
        let thread = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || self.run(receiver, thread_shared))
            .map_err(SchedulerError::Spawn)?;

        Ok(SchedulerHandle {
            control: SchedulerControl { shared, signals },
            publisher,
            thread: Some(thread),
        })
    }

    fn run(mut self, signals: Receiver<Signal>, shared: Arc<Shared>) {
        let _running = RunningGuard(&shared);
        let period = self.config.period;
        // `None` once the next tick no longer fits in an `Instant`. Only triggers and stop
        // requests wake the scheduler from then on.
        let mut next_tick = if self.config.run_immediately {
            Some(Instant::now())
        } else {
            Instant::now().checked_add(period)
        };

        info!(
            thread = %self.config.thread_name,
            period = ?period,
            "snapshot scheduler started"
        );

        loop {
            if shared.stop_requested() {
                break;
            }

            let signal = match next_tick {
                Some(deadline) => signals.recv_deadline(deadline),
                None => signals.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match signal {
                Ok(Signal::Trigger) => {}
                Ok(Signal::Wake) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    next_tick = next_tick.and_then(|tick| tick.checked_add(period))
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if shared.stop_requested() {
                break;
            }

            self.run_cycle(Some(&shared.stop));

            let now = Instant::now();
            if let Some(tick) = next_tick.filter(|tick| now > *tick) {
                let behind = now - tick;
                let skipped = u32::try_from(behind.as_nanos() / period.as_nanos() + 1)
                    .unwrap_or(u32::MAX);
                next_tick = tick.checked_add(period.saturating_mul(skipped));
                self.counters.record_coalesced(u64::from(skipped));
                debug!(skipped, "acquisition overran its period, skipping ticks");
            }
        }

        info!(thread = %self.config.thread_name, "snapshot scheduler stopped");
    }
}

enum Signal {
    /// Run a cycle now, out of cadence.
    Trigger,
    /// Re-check the stop flag.
    Wake,
}

struct Shared {
    stop: AtomicBool,
    running: AtomicBool,
    counters: Arc<CycleCounters>,
}

impl Shared {
    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

struct RunningGuard<'a>(&'a Shared);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

/// Cloneable remote control for a running scheduler. Every method is non-blocking and can be
/// called from any thread, including concurrently with an in-flight acquisition.
#[derive(Clone)]
pub struct SchedulerControl {
    shared: Arc<Shared>,
    signals: Sender<Signal>,
}

impl SchedulerControl {
    /// Asks for a cycle outside of the regular cadence. At most one request is queued; if one is
    /// already pending it is coalesced with this one and `false` is returned. A trigger issued
    /// while a cycle is in flight runs once that cycle completes.
    pub fn trigger_now(&self) -> bool {
        if self.shared.stop_requested() {
            return false;
        }

        match self.signals.try_send(Signal::Trigger) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.shared.counters.record_coalesced(1);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Signals the scheduler to stop without waiting for it.
    pub fn request_stop(&self) {
        self.shared.stop.store(true, Ordering::Release);
        // A full channel already guarantees a wake-up.
        let _ = self.signals.try_send(Signal::Wake);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> CycleStats {
        self.shared.counters.snapshot()
    }
}

impl fmt::Debug for SchedulerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerControl")
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Owns the scheduler thread. Dropping the handle requests a stop and joins the thread.
pub struct SchedulerHandle<T> {
    control: SchedulerControl,
    publisher: SharedPublisher<T>,
    thread: Option<JoinHandle<()>>,
}

impl<T> SchedulerHandle<T> {
    pub fn control(&self) -> SchedulerControl {
        self.control.clone()
    }

    /// The publisher this scheduler publishes to.
    pub fn publisher(&self) -> &SharedPublisher<T> {
        &self.publisher
    }

    pub fn trigger_now(&self) -> bool {
        self.control.trigger_now()
    }

    pub fn request_stop(&self) {
        self.control.request_stop()
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn stats(&self) -> CycleStats {
        self.control.stats()
    }

    /// Requests a stop and waits for the scheduler thread to exit. An acquisition in flight is
    /// waited for and then handled per the configured [`StopPolicy`].
    pub fn stop(mut self) -> Result<CycleStats, SchedulerError> {
        self.control.request_stop();
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|payload| SchedulerError::Panicked(panic_message(&*payload)))?;
        }

        Ok(self.control.stats())
    }
}

impl<T> Drop for SchedulerHandle<T> {
    fn drop(&mut self) {
        self.control.request_stop();
        if let Some(thread) = self.thread.take() {
            if let Err(payload) = thread.join() {
                warn!(
                    panic = %panic_message(&*payload),
                    "snapshot scheduler thread panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Error returned when a scheduler can't be started or didn't shut down cleanly.
#[derive(thiserror::Error, Debug)]
pub enum SchedulerError {
    #[error("Failed to spawn the scheduler thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("The scheduler thread panicked: {0}")]
    Panicked(String),
}
