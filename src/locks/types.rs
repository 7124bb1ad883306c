//! Lock file and lock handle definitions.

use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime};

/// Name prefix shared by every lock file.
pub const LOCK_FILE_PREFIX: &str = "lockfile";

/// A sequenced lock file observed in (or created in) the lock directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFile {
    /// Sequence number parsed from the name.
    pub sequence: u64,

    /// The file name as it appears in the directory (e.g. `lockfile7`).
    pub name: String,

    /// Last-modified time of the entry, which the coordinator stamps at creation.
    pub created_at: SystemTime,
}

impl LockFile {
    /// Canonical file name for a sequence number.
    pub fn name_for(sequence: u64) -> String {
        format!("{}{}", LOCK_FILE_PREFIX, sequence)
    }

    /// Time since the lock was created, as seen at `now`.
    pub fn age(&self, now: SystemTime) -> Duration {
        crate::clock::elapsed_between(self.created_at, now)
    }

    /// Whether a holder of this lock is presumed hung or gone.
    pub fn is_expired(&self, now: SystemTime, timeout: Duration) -> bool {
        self.age(now) >= timeout
    }
}

impl std::fmt::Display for LockFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A lock this process created and currently owns.
///
/// Deliberately not `Clone`: the handle is consumed by
/// [`LockCoordinator::release`](super::LockCoordinator::release).
#[derive(Debug, PartialEq, Eq)]
pub struct LockHandle {
    lock: LockFile,
}

impl LockHandle {
    pub(super) fn new(lock: LockFile) -> Self {
        Self { lock }
    }

    /// The lock file backing this handle.
    pub fn lock(&self) -> &LockFile {
        &self.lock
    }

    pub fn name(&self) -> &str {
        &self.lock.name
    }

    pub fn sequence(&self) -> u64 {
        self.lock.sequence
    }

    /// Timestamp recorded when the lock file was created.
    pub fn acquired_at(&self) -> SystemTime {
        self.lock.created_at
    }
}

/// Format a wall-clock instant for operator output.
pub fn format_timestamp(at: SystemTime) -> String {
    DateTime::<Utc>::from(at)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Format a lock age as a short human-readable string.
pub fn age_string(age: Duration) -> String {
    let secs = age.as_secs();
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", age.as_millis())
    }
}
