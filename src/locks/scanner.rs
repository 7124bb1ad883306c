//! Lock directory scanning.
//!
//! Every decision is made against a fresh listing; nothing is cached.

use super::store::LockStore;
use super::types::LockFile;
use crate::error::LockError;
use regex::Regex;
use std::io;
use std::sync::LazyLock;

static LOCK_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^lockfile([0-9]+)$").expect("Invalid lock name regex"));

/// Parse the sequence number out of a lock file name.
///
/// Returns `Ok(None)` for names that are not lock files and
/// [`LockError::MalformedLockName`] when the digits do not fit a sequence.
pub fn parse_sequence(name: &str) -> Result<Option<u64>, LockError> {
    let Some(caps) = LOCK_NAME_REGEX.captures(name) else {
        return Ok(None);
    };

    caps[1]
        .parse::<u64>()
        .map(Some)
        .map_err(|_| LockError::MalformedLockName(name.to_string()))
}

/// Lock file names in the directory with their sequence numbers, latest last.
fn sequenced_names<S: LockStore + ?Sized>(store: &S) -> Result<Vec<(u64, String)>, LockError> {
    let names = store.names().map_err(|e| filesystem_error(store, e))?;

    let mut sequenced = Vec::new();
    for name in names {
        if let Some(sequence) = parse_sequence(&name)? {
            sequenced.push((sequence, name));
        }
    }

    // Numeric order; the name breaks ties between e.g. `lockfile07` and `lockfile7`.
    sequenced.sort();
    Ok(sequenced)
}

/// What a scan found at the top of the lock directory.
#[derive(Debug)]
pub enum Scan {
    /// No lock files at all.
    Empty,

    /// The lock file with the greatest sequence number.
    Latest(LockFile),

    /// The latest entry was listed but removed before it could be read.
    ///
    /// Its holder released it, or a takeover deleted it, while this scan was
    /// in progress. Either way someone else may already be creating the next
    /// lock, so the scan result cannot be acted on.
    Vanished(String),
}

/// Find the lock file with the greatest sequence number.
pub fn find_latest<S: LockStore + ?Sized>(store: &S) -> Result<Scan, LockError> {
    let Some((sequence, name)) = sequenced_names(store)?.pop() else {
        return Ok(Scan::Empty);
    };

    let created_at = match store.modified(&name) {
        Ok(at) => at,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scan::Vanished(name)),
        Err(e) => return Err(filesystem_error(store, e)),
    };

    Ok(Scan::Latest(LockFile {
        sequence,
        name,
        created_at,
    }))
}

/// List every lock file in the directory, ascending by sequence.
///
/// Entries removed while the listing is in progress are skipped.
pub fn list_locks<S: LockStore + ?Sized>(store: &S) -> Result<Vec<LockFile>, LockError> {
    let mut locks = Vec::new();

    for (sequence, name) in sequenced_names(store)? {
        let created_at = match store.modified(&name) {
            Ok(at) => at,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(filesystem_error(store, e)),
        };
        locks.push(LockFile {
            sequence,
            name,
            created_at,
        });
    }

    Ok(locks)
}

fn filesystem_error<S: LockStore + ?Sized>(store: &S, source: io::Error) -> LockError {
    LockError::Filesystem {
        path: store.location().to_path_buf(),
        source,
    }
}
