//! Implementation of the `lockrelay status` command.

use super::resolve_config;
use crate::cli::StatusArgs;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::locks::{self, DirStore, LockFile, age_string, format_timestamp};
use std::time::{Duration, SystemTime};

pub fn cmd_status(args: StatusArgs) -> Result<()> {
    let config = resolve_config(&args.config)?;
    let store = DirStore::new(&config.lock_dir);
    let locks = locks::list_locks(&store)?;

    println!("Lock directory: {}", config.lock_dir.display());
    println!("Lock timeout:   {}ms", config.lock_timeout_ms);
    println!();

    if locks.is_empty() {
        println!("No lock files.");
        return Ok(());
    }

    for line in render_locks(&locks, SystemClock.now(), config.lock_timeout()) {
        println!("{}", line);
    }

    let orphans = orphan_count(&locks);
    if orphans > 0 {
        println!();
        println!(
            "Note: {} orphaned lock file(s) left by failed deletes. Use `lockrelay clear <name> --force` to remove.",
            orphans
        );
    }

    Ok(())
}

/// Whether `lock` is below the highest sequence in `locks`.
///
/// Every file carrying the highest sequence counts as current, including
/// zero-padded duplicates such as `lockfile07` next to `lockfile7`.
fn is_orphan(lock: &LockFile, locks: &[LockFile]) -> bool {
    locks.iter().any(|other| other.sequence > lock.sequence)
}

fn orphan_count(locks: &[LockFile]) -> usize {
    locks.iter().filter(|lock| is_orphan(lock, locks)).count()
}

/// One line per lock file; the highest sequence is the current lock.
fn render_locks(locks: &[LockFile], now: SystemTime, timeout: Duration) -> Vec<String> {
    locks
        .iter()
        .map(|lock| {
            let role = if is_orphan(lock, locks) {
                "orphaned"
            } else {
                "current"
            };
            let state = if lock.is_expired(now, timeout) {
                "EXPIRED"
            } else {
                "FRESH"
            };
            format!(
                "  {:<20} {:<8} {:<8} age {:<8} created {}",
                lock.name,
                role,
                state,
                age_string(lock.age(now)),
                format_timestamp(lock.created_at)
            )
        })
        .collect()
}
