//! Locking subsystem for lockrelay.
//!
//! Cooperating instances share one lock directory and serialize their work
//! through sequenced, empty lock files named `lockfile<N>`.
//!
//! # Lock Files
//!
//! A lock file is created with **create_new** semantics (exclusive create), so
//! of all instances racing for the same name exactly one succeeds. The file's
//! modification time is its creation timestamp; its contents are unused.
//!
//! # Expiry and Takeover
//!
//! A lock older than the configured timeout is presumed abandoned. The next
//! instance to see it creates `lockfile<N+1>` and then deletes `lockfile<N>`.
//! The scanner always prefers the highest sequence, so a predecessor that
//! could not be deleted is inert clutter rather than a live lock.
//!
//! If the latest lock is removed between listing the directory and reading
//! its timestamp, the attempt is abandoned for this tick. Its holder may have
//! just released it, and another instance may already own `lockfile1`.
//!
//! # Release
//!
//! An owner deletes its lock after its work, unless the lock expired while it
//! was held; in that case the file is left for whoever takes it over.

mod coordinator;
mod scanner;
mod store;
mod types;


// Re-export public API
pub use coordinator::{AcquireOutcome, LockCoordinator, ReleaseOutcome};
pub use scanner::{Scan, find_latest, list_locks, parse_sequence};
pub use store::{DirStore, LockStore};
pub use types::{LOCK_FILE_PREFIX, LockFile, LockHandle, age_string, format_timestamp};
