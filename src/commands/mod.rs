//! Command implementations for lockrelay.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the config resolution they share.

mod clear;
mod run;
mod status;

use crate::cli::{Command, ConfigArgs};
use crate::config::Config;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Status(args) => status::cmd_status(args),
        Command::Clear(args) => clear::cmd_clear(args),
    }
}

/// Load the config file (if any) and apply command-line overrides.
///
/// Validation runs after the overrides so a flag cannot sneak in a value the
/// file would have been rejected for.
fn resolve_config(args: &ConfigArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &args.dir {
        config.lock_dir = dir.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.lock_timeout_ms = timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn resolve_config_without_file_uses_defaults() {
        let config = resolve_config(&ConfigArgs::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn resolve_config_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockrelay.yaml");
        std::fs::write(&path, "lock_dir: from-file\nlock_timeout_ms: 5000\n").unwrap();

        let args = ConfigArgs {
            config: Some(path),
            dir: Some(PathBuf::from("from-flag")),
            timeout_ms: None,
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.lock_dir, PathBuf::from("from-flag"));
        assert_eq!(config.lock_timeout_ms, 5000);
    }

    #[test]
    fn resolve_config_validates_overrides() {
        let args = ConfigArgs {
            timeout_ms: Some(0),
            ..ConfigArgs::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_FAILURE);
    }
}
