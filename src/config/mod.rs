//! Configuration for lockrelay.
//!
//! This module defines the Config struct that can be loaded from a YAML file.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults matching the reference deployment (20 s lock timeout, 5 s poll
//! interval), and validation of config values.

mod model;
mod operations;
pub(crate) mod types;


// Re-export public API
pub use model::Config;
