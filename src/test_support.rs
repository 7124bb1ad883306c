use crate::clock::ManualClock;
use crate::locks::{DirStore, LockCoordinator, LockStore};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

pub(crate) const TEST_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Write an empty lock file with the given modification time.
pub(crate) fn write_lock(dir: &Path, name: &str, modified: SystemTime) {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dir.join(name))
        .unwrap();
    file.set_modified(modified).unwrap();
}

/// Sorted names of every entry in a directory.
pub(crate) fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub(crate) fn modified_of(dir: &Path, name: &str) -> SystemTime {
    File::open(dir.join(name))
        .unwrap()
        .metadata()
        .unwrap()
        .modified()
        .unwrap()
}

pub(crate) fn coordinator(
    dir: &Path,
    clock: &ManualClock,
) -> LockCoordinator<DirStore, ManualClock> {
    LockCoordinator::new(DirStore::new(dir), clock.clone(), TEST_TIMEOUT)
}

/// A directory store with injectable faults.
#[derive(Debug)]
pub(crate) struct FaultyStore {
    inner: DirStore,
    fail_remove: HashSet<String>,
    fail_create: HashSet<String>,
    preempt_create: HashSet<String>,
    listing: Option<Vec<String>>,
}

impl FaultyStore {
    pub(crate) fn new(dir: &Path) -> Self {
        Self {
            inner: DirStore::new(dir),
            fail_remove: HashSet::new(),
            fail_create: HashSet::new(),
            preempt_create: HashSet::new(),
            listing: None,
        }
    }

    /// Removing `name` fails with a permission error.
    pub(crate) fn failing_remove(mut self, name: &str) -> Self {
        self.fail_remove.insert(name.to_string());
        self
    }

    /// Creating `name` fails with a permission error.
    pub(crate) fn failing_create(mut self, name: &str) -> Self {
        self.fail_create.insert(name.to_string());
        self
    }

    /// Another instance creates `name` just before this store tries to.
    pub(crate) fn preempted_create(mut self, name: &str) -> Self {
        self.preempt_create.insert(name.to_string());
        self
    }

    /// `names()` returns this fixed listing regardless of what is on disk,
    /// as if the entries changed right after the directory was read.
    pub(crate) fn listing(mut self, names: &[&str]) -> Self {
        self.listing = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }
}

fn permission_denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "simulated permission denied")
}

impl LockStore for FaultyStore {
    fn location(&self) -> &Path {
        self.inner.location()
    }

    fn names(&self) -> io::Result<Vec<String>> {
        if let Some(listing) = &self.listing {
            return Ok(listing.clone());
        }
        self.inner.names()
    }

    fn modified(&self, name: &str) -> io::Result<SystemTime> {
        self.inner.modified(name)
    }

    fn create_new(&self, name: &str, stamp: SystemTime) -> io::Result<()> {
        if self.fail_create.contains(name) {
            return Err(permission_denied());
        }
        if self.preempt_create.contains(name) {
            self.inner.create_new(name, stamp)?;
        }
        self.inner.create_new(name, stamp)
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        if self.fail_remove.contains(name) {
            return Err(permission_denied());
        }
        self.inner.remove(name)
    }
}
