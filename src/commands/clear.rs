//! Implementation of the `lockrelay clear` command.

use super::resolve_config;
use crate::cli::ClearArgs;
use crate::error::{LockRelayError, Result};
use crate::locks::{self, DirStore, LockStore};
use std::io;

pub fn cmd_clear(args: ClearArgs) -> Result<()> {
    // Require --force flag
    if !args.force {
        return Err(LockRelayError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a lock while its holder is still working lets another instance\n\
             start the same work concurrently. Expired locks are taken over automatically.\n\n\
             To clear the lock, run:\n  lockrelay clear {} --force",
            args.lock_name
        )));
    }

    if locks::parse_sequence(&args.lock_name)?.is_none() {
        return Err(LockRelayError::UserError(format!(
            "'{}' is not a lock file name (expected {}<N>)",
            args.lock_name,
            locks::LOCK_FILE_PREFIX
        )));
    }

    let config = resolve_config(&args.config)?;
    let store = DirStore::new(&config.lock_dir);

    store.remove(&args.lock_name).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LockRelayError::UserError(format!(
                "lock '{}' does not exist in: {}",
                args.lock_name,
                config.lock_dir.display()
            ))
        } else {
            LockRelayError::UserError(format!(
                "failed to clear lock '{}': {}",
                args.lock_name, e
            ))
        }
    })?;

    tracing::warn!(
        event = "lock_cleared",
        lock = %args.lock_name,
        "lock cleared manually"
    );
    println!("Cleared lock: {}", args.lock_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::exit_codes;
    use crate::test_support::{dir_names, write_lock};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn args(dir: &std::path::Path, name: &str, force: bool) -> ClearArgs {
        ClearArgs {
            lock_name: name.to_string(),
            force,
            config: ConfigArgs {
                dir: Some(dir.to_path_buf()),
                ..ConfigArgs::default()
            },
        }
    }

    #[test]
    fn clear_refuses_without_force() {
        let temp_dir = TempDir::new().unwrap();
        write_lock(temp_dir.path(), "lockfile1", SystemTime::now());

        let err = cmd_clear(args(temp_dir.path(), "lockfile1", false)).unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("--force"));
        assert_eq!(dir_names(temp_dir.path()), vec!["lockfile1"]);
    }

    #[test]
    fn clear_removes_named_lock() {
        let temp_dir = TempDir::new().unwrap();
        write_lock(temp_dir.path(), "lockfile1", SystemTime::now());
        write_lock(temp_dir.path(), "lockfile2", SystemTime::now());

        cmd_clear(args(temp_dir.path(), "lockfile1", true)).unwrap();

        assert_eq!(dir_names(temp_dir.path()), vec!["lockfile2"]);
    }

    #[test]
    fn clear_rejects_non_lock_names() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "keep").unwrap();

        let err = cmd_clear(args(temp_dir.path(), "notes.txt", true)).unwrap_err();

        assert!(err.to_string().contains("not a lock file name"));
        assert_eq!(dir_names(temp_dir.path()), vec!["notes.txt"]);
    }

    #[test]
    fn clear_missing_lock_fails() {
        let temp_dir = TempDir::new().unwrap();

        let err = cmd_clear(args(temp_dir.path(), "lockfile9", true)).unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }
}
