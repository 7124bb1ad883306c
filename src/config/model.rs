//! Config struct definition and default implementation.

use super::types::*;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for a lockrelay worker.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Directory shared by all cooperating instances.
    #[serde(default = "default_lock_dir")]
    pub lock_dir: PathBuf,

    /// Milliseconds after which a lock is presumed abandoned.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Milliseconds to wait between the end of one cycle and the next.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    // =========================================================================
    // Simulated work
    // =========================================================================
    /// Upper bound (exclusive) of the random work duration.
    #[serde(default = "default_work_max_ms")]
    pub work_max_ms: u64,

    /// Chance that a cycle simulates a hung holder.
    #[serde(default = "default_hang_probability")]
    pub hang_probability: f64,

    /// Extra time a simulated hang adds to the work.
    #[serde(default = "default_hang_ms")]
    pub hang_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_dir: default_lock_dir(),
            lock_timeout_ms: default_lock_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            work_max_ms: default_work_max_ms(),
            hang_probability: default_hang_probability(),
            hang_ms: default_hang_ms(),
        }
    }
}
