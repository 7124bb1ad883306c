//! Wall-clock source for lock freshness decisions.

use std::time::{Duration, SystemTime};

/// Source of "now" for the lock coordinator.
///
/// Freshness is judged against file modification times, so this must be a
/// wall clock, not a monotonic one.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Time elapsed from `since` to `now`.
///
/// A timestamp in the future (clock skew between hosts sharing the
/// directory) counts as zero elapsed, so the lock reads as fresh.
pub fn elapsed_between(since: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(since).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
pub use manual::ManualClock;
