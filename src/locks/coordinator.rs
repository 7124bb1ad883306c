//! Acquire/release state machine for sequenced lock files.
//!
//! Exclusivity comes only from the store's create-if-absent primitive:
//! whoever creates `lockfile<N>` owns sequence `N`. An expired lock is handed
//! over by creating its successor first and only then removing it, so a
//! failed create never loses the existing lock.

use super::scanner::{self, Scan};
use super::store::LockStore;
use super::types::{LockFile, LockHandle};
use crate::clock::{self, Clock};
use crate::error::LockError;
use std::io;
use std::time::Duration;

/// Result of a single acquisition attempt.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// No lock existed and this call created the first one.
    Created(LockHandle),

    /// The latest lock had expired; this call created its successor.
    TookOver {
        handle: LockHandle,
        predecessor: LockFile,
        /// False when the expired predecessor could not be removed and is
        /// now an orphan in the directory.
        predecessor_removed: bool,
    },

    /// The latest lock is still fresh.
    Held { current: LockFile, age: Duration },

    /// Another instance created the name this call wanted first.
    RaceLost { name: String },

    /// The latest lock disappeared while it was being inspected. Acting on
    /// the stale listing could create a second live lock, so the tick ends.
    Vanished { name: String },

    /// Creating the lock file failed for a reason other than a lost race.
    CreateFailed { name: String, error: io::Error },
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        self.handle().is_some()
    }

    pub fn handle(&self) -> Option<&LockHandle> {
        match self {
            AcquireOutcome::Created(handle) | AcquireOutcome::TookOver { handle, .. } => {
                Some(handle)
            }
            _ => None,
        }
    }

    pub fn into_handle(self) -> Option<LockHandle> {
        match self {
            AcquireOutcome::Created(handle) | AcquireOutcome::TookOver { handle, .. } => {
                Some(handle)
            }
            _ => None,
        }
    }
}

/// Result of releasing an owned lock.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The lock file was removed.
    Released,

    /// The lock outlived the timeout while held and was left in place.
    Expired { held_for: Duration },

    /// Removal was attempted and failed; the lock will expire on its own.
    RemoveFailed { error: io::Error },
}

impl ReleaseOutcome {
    /// Whether the lock file was deleted.
    pub fn deleted(&self) -> bool {
        matches!(self, ReleaseOutcome::Released)
    }
}

/// Coordinates lock ownership through a shared lock directory.
#[derive(Debug)]
pub struct LockCoordinator<S, C> {
    store: S,
    clock: C,
    timeout: Duration,
}

impl<S: LockStore, C: Clock> LockCoordinator<S, C> {
    pub fn new(store: S, clock: C, timeout: Duration) -> Self {
        Self {
            store,
            clock,
            timeout,
        }
    }

    /// Make one attempt to take the lock.
    ///
    /// Never retries: a lost race or a fresh lock is reported and the next
    /// scheduled tick tries again.
    ///
    /// # Errors
    ///
    /// * [`LockError::Filesystem`] - the directory could not be scanned
    /// * [`LockError::MalformedLockName`] - a lock name has unparseable digits
    /// * [`LockError::SequenceExhausted`] - the latest lock is at `u64::MAX`
    pub fn acquire(&self) -> Result<AcquireOutcome, LockError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        let latest = match scanner::find_latest(&self.store)? {
            Scan::Latest(latest) => latest,
            Scan::Empty => {
                tracing::info!(
                    event = "lock_absent",
                    "lock file does not exist, trying to create"
                );
                return Ok(match self.create(1) {
                    Ok(handle) => AcquireOutcome::Created(handle),
                    Err(outcome) => outcome,
                });
            }
            Scan::Vanished(name) => {
                tracing::info!(
                    event = "lock_vanished",
                    lock = %name,
                    "latest lock removed while scanning, skipping this tick"
                );
                return Ok(AcquireOutcome::Vanished { name });
            }
        };

        let now = self.clock.now();
        let age = latest.age(now);
        let age_ms = age.as_millis() as u64;

        if age < self.timeout {
            tracing::info!(
                event = "lock_held",
                lock = %latest,
                age_ms,
                timeout_ms,
                "lock is held"
            );
            return Ok(AcquireOutcome::Held {
                current: latest,
                age,
            });
        }

        tracing::info!(
            event = "lock_expired",
            lock = %latest,
            age_ms,
            timeout_ms,
            "lock has expired"
        );

        let next = latest
            .sequence
            .checked_add(1)
            .ok_or_else(|| LockError::SequenceExhausted(latest.name.clone()))?;

        let handle = match self.create(next) {
            Ok(handle) => handle,
            // The expired lock stays for the next poller
            Err(outcome) => return Ok(outcome),
        };

        let predecessor_removed = match self.store.remove(&latest.name) {
            Ok(()) => {
                tracing::info!(
                    event = "predecessor_deleted",
                    lock = %latest,
                    "expired lock deleted"
                );
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    event = "predecessor_deleted",
                    lock = %latest,
                    "expired lock already gone"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    event = "predecessor_orphaned",
                    lock = %latest,
                    successor = %handle.lock(),
                    error = %e,
                    "unable to delete expired lock, leaving it orphaned"
                );
                false
            }
        };

        tracing::info!(
            event = "lock_taken_over",
            lock = %handle.lock(),
            predecessor = %latest,
            "lock taken over"
        );

        Ok(AcquireOutcome::TookOver {
            handle,
            predecessor: latest,
            predecessor_removed,
        })
    }

    /// Release a lock obtained from [`acquire`](Self::acquire).
    ///
    /// A lock that has outlived the timeout is not deleted: another
    /// instance may already consider it expired and be taking it over.
    pub fn release(&self, handle: LockHandle) -> ReleaseOutcome {
        let held_for = clock::elapsed_between(handle.acquired_at(), self.clock.now());
        let held_ms = held_for.as_millis() as u64;
        let timeout_ms = self.timeout.as_millis() as u64;

        if held_for >= self.timeout {
            tracing::warn!(
                event = "held_past_timeout",
                lock = %handle.lock(),
                held_ms,
                timeout_ms,
                "lock held past timeout, not deleting"
            );
            return ReleaseOutcome::Expired { held_for };
        }

        match self.store.remove(handle.name()) {
            Ok(()) => {
                tracing::info!(
                    event = "release",
                    lock = %handle.lock(),
                    held_ms,
                    "lock released"
                );
                ReleaseOutcome::Released
            }
            Err(error) => {
                tracing::warn!(
                    event = "release_failed",
                    lock = %handle.lock(),
                    error = %error,
                    "unable to delete lock file"
                );
                ReleaseOutcome::RemoveFailed { error }
            }
        }
    }

    /// Exclusively create `lockfile<sequence>` stamped with the current time.
    fn create(&self, sequence: u64) -> Result<LockHandle, AcquireOutcome> {
        let name = LockFile::name_for(sequence);
        let created_at = self.clock.now();

        match self.store.create_new(&name, created_at) {
            Ok(()) => {
                tracing::info!(
                    event = "lock_created",
                    lock = %name,
                    "new lock file created"
                );
                Ok(LockHandle::new(LockFile {
                    sequence,
                    name,
                    created_at,
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::info!(
                    event = "race_lost",
                    lock = %name,
                    "lock file created by another instance first"
                );
                Err(AcquireOutcome::RaceLost { name })
            }
            Err(error) => {
                tracing::warn!(
                    event = "create_failed",
                    lock = %name,
                    error = %error,
                    "unable to create lock file"
                );
                Err(AcquireOutcome::CreateFailed { name, error })
            }
        }
    }
}
