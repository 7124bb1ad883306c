//! Filesystem primitives the lock protocol is built on.
//!
//! The coordinator only ever lists names, reads a modification time, creates
//! a file exclusively and removes a file. [`LockStore`] is that surface;
//! [`DirStore`] backs it with a real directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory operations used by the scanner and the coordinator.
pub trait LockStore {
    /// The directory this store operates on, for diagnostics.
    fn location(&self) -> &Path;

    /// Names of all entries currently in the directory.
    fn names(&self) -> io::Result<Vec<String>>;

    /// Last-modified time of an entry.
    fn modified(&self, name: &str) -> io::Result<SystemTime>;

    /// Create an empty entry only if none exists, stamping its mtime.
    ///
    /// Must fail with [`io::ErrorKind::AlreadyExists`] when the name is taken.
    fn create_new(&self, name: &str, stamp: SystemTime) -> io::Result<()>;

    /// Remove an entry.
    fn remove(&self, name: &str) -> io::Result<()>;
}

/// A lock directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl LockStore for DirStore {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Lock names are ASCII; anything else cannot be one of ours.
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn modified(&self, name: &str) -> io::Result<SystemTime> {
        fs::metadata(self.path_of(name))?.modified()
    }

    fn create_new(&self, name: &str, stamp: SystemTime) -> io::Result<()> {
        let path = self.path_of(name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        if let Err(e) = file.set_modified(stamp) {
            // Clean up so an unstamped file never poses as a live lock
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path_of(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn create_new_refuses_existing_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirStore::new(temp_dir.path());
        let now = SystemTime::now();

        store.create_new("lockfile1", now).unwrap();
        let err = store.create_new("lockfile1", now).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn create_new_stamps_modified_time() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirStore::new(temp_dir.path());
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        store.create_new("lockfile4", stamp).unwrap();

        assert_eq!(store.modified("lockfile4").unwrap(), stamp);
        assert_eq!(fs::read(temp_dir.path().join("lockfile4")).unwrap().len(), 0);
    }

    #[test]
    fn names_lists_every_entry() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lockfile2"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();
        let store = DirStore::new(temp_dir.path());

        let mut names = store.names().unwrap();
        names.sort();

        assert_eq!(names, vec!["lockfile2".to_string(), "notes.txt".to_string()]);
    }

    #[test]
    fn names_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirStore::new(temp_dir.path().join("missing"));

        assert_eq!(store.names().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn remove_missing_entry_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirStore::new(temp_dir.path());

        let err = store.remove("lockfile9").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
