//! The periodic acquire → work → release cycle.
//!
//! A cycle makes exactly one acquisition attempt. Whatever goes wrong inside a
//! cycle (a lost race, an unreadable directory) only ends that cycle; the loop
//! tries again after the poll interval.

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{LockError, LockRelayError, Result};
use crate::locks::{AcquireOutcome, LockCoordinator, LockStore, ReleaseOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity at which sleeps notice a stop request.
const STOP_POLL: Duration = Duration::from_millis(100);

/// The work performed while holding the lock.
///
/// It may run for any length of time, including past the lock timeout; the
/// coordinator never interrupts it.
pub trait WorkUnit {
    fn run(&mut self);
}

/// Work that just sleeps for a random duration, sometimes long enough to
/// look like a hung holder.
#[derive(Debug)]
pub struct SimulatedWork {
    max: Duration,
    hang_probability: f64,
    hang: Duration,
    rng: fastrand::Rng,
}

impl SimulatedWork {
    pub fn new(max: Duration, hang_probability: f64, hang: Duration, rng: fastrand::Rng) -> Self {
        Self {
            max,
            hang_probability,
            hang,
            rng,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.work_max(),
            config.hang_probability,
            config.hang(),
            fastrand::Rng::new(),
        )
    }

    /// Pick the duration of the next run.
    fn plan(&mut self) -> Duration {
        let max_ms = self.max.as_millis() as u64;
        let mut duration = if max_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(self.rng.u64(0..max_ms))
        };

        if self.rng.f64() < self.hang_probability {
            tracing::info!(
                event = "work_hang",
                hang_ms = self.hang.as_millis() as u64,
                "simulating a hang"
            );
            duration += self.hang;
        }

        duration
    }
}

impl WorkUnit for SimulatedWork {
    fn run(&mut self) {
        let duration = self.plan();
        tracing::info!(
            event = "work_started",
            duration_ms = duration.as_millis() as u64,
            "starting processing"
        );
        thread::sleep(duration);
        tracing::info!(event = "work_finished", "done processing");
    }
}

/// What a single cycle did.
#[derive(Debug)]
pub enum CycleReport {
    /// The lock was not acquired; no work ran.
    Skipped(AcquireOutcome),

    /// Work ran under the named lock and the lock was then released.
    Completed {
        lock: String,
        elapsed: Duration,
        release: ReleaseOutcome,
    },
}

impl CycleReport {
    pub fn worked(&self) -> bool {
        matches!(self, CycleReport::Completed { .. })
    }
}

/// Run one acquire → work → release cycle.
pub fn run_cycle<S, C, W>(
    coordinator: &LockCoordinator<S, C>,
    work: &mut W,
) -> std::result::Result<CycleReport, LockError>
where
    S: LockStore,
    C: Clock,
    W: WorkUnit + ?Sized,
{
    let outcome = coordinator.acquire()?;
    let handle = match outcome {
        AcquireOutcome::Created(handle) | AcquireOutcome::TookOver { handle, .. } => handle,
        other => {
            tracing::info!(
                event = "cycle_skipped",
                "unable to acquire lock, going back to sleep"
            );
            return Ok(CycleReport::Skipped(other));
        }
    };

    tracing::info!(event = "lock_acquired", lock = %handle.lock(), "lock acquired");
    let lock = handle.name().to_string();
    let started = Instant::now();

    work.run();

    let elapsed = started.elapsed();
    let release = coordinator.release(handle);

    Ok(CycleReport::Completed {
        lock,
        elapsed,
        release,
    })
}

/// Repeat cycles with a fixed delay until `running` is cleared.
///
/// `max_cycles` bounds the loop; `None` runs until stopped. Returns the
/// number of cycles run.
pub fn run_loop<S, C, W>(
    coordinator: &LockCoordinator<S, C>,
    work: &mut W,
    running: &AtomicBool,
    interval: Duration,
    max_cycles: Option<usize>,
) -> usize
where
    S: LockStore,
    C: Clock,
    W: WorkUnit + ?Sized,
{
    let mut cycles = 0;

    while running.load(Ordering::SeqCst) {
        cycles += 1;
        let span = tracing::info_span!("cycle", n = cycles);
        let _enter = span.enter();

        if let Err(e) = run_cycle(coordinator, work) {
            tracing::error!(event = "cycle_aborted", error = %e, "cycle aborted");
        }

        if max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }

        sleep_while_running(running, interval);
    }

    cycles
}

/// Sleep for `duration`, returning early once `running` is cleared.
pub fn sleep_while_running(running: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

/// Install a Ctrl-C handler and return the shared run flag it clears.
pub fn install_ctrlc_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_for_signal = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_for_signal.store(false, Ordering::SeqCst);
    })
    .map_err(|e| LockRelayError::UserError(format!("failed to install Ctrl-C handler: {}", e)))?;
    Ok(running)
}

/// Identity of this instance for log correlation (`user@host:pid`).
pub fn instance_id() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}:{}", user, host, std::process::id())
}
