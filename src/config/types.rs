//! Default values for configuration fields.

use std::path::PathBuf;

// Default value functions for serde
pub(crate) fn default_lock_dir() -> PathBuf {
    PathBuf::from(".")
}
pub(crate) fn default_lock_timeout_ms() -> u64 {
    20_000
}
pub(crate) fn default_poll_interval_ms() -> u64 {
    5_000
}
pub(crate) fn default_work_max_ms() -> u64 {
    15_000
}
pub(crate) fn default_hang_probability() -> f64 {
    0.2
}
pub(crate) fn default_hang_ms() -> u64 {
    20_000
}
