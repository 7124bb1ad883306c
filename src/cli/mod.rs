//! CLI argument parsing for lockrelay.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Lockrelay: a periodic worker coordinated through sequenced lock files.
///
/// Several instances can point at the same lock directory. Each tick, an
/// instance tries to take the lock, runs its work while holding it, and
/// releases it. A lock older than the timeout is presumed abandoned and
/// taken over by the next instance that polls.
#[derive(Parser, Debug)]
#[command(name = "lockrelay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for lockrelay.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the periodic worker.
    ///
    /// Each cycle tries to acquire the lock, runs the simulated work while
    /// holding it, then releases it. Stops on Ctrl-C.
    Run(RunArgs),

    /// Show the lock files in the lock directory.
    ///
    /// Lists every lock file with its age, whether it has expired, and
    /// which one is current.
    Status(StatusArgs),

    /// Remove a lock file by name.
    ///
    /// Only use this when you are certain the holder is gone.
    Clear(ClearArgs),
}

/// Options shared by every command that reads the configuration.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// YAML config file (defaults are used when omitted).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lock directory (overrides `lock_dir`).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Lock timeout in milliseconds (overrides `lock_timeout_ms`).
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Delay between cycles in milliseconds (overrides `poll_interval_ms`).
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Run a single cycle and exit.
    #[arg(long)]
    pub once: bool,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `clear` command.
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Lock file name to remove (e.g. "lockfile7").
    pub lock_name: String,

    /// Required: acknowledge that the holder may still be running.
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["lockrelay", "run"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert!(!args.once);
            assert!(args.interval_ms.is_none());
            assert!(args.config.config.is_none());
            assert!(args.config.dir.is_none());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_full() {
        let cli = Cli::try_parse_from([
            "lockrelay",
            "run",
            "--dir",
            "/tmp/locks",
            "--config",
            "lockrelay.yaml",
            "--timeout-ms",
            "1000",
            "--interval-ms",
            "250",
            "--once",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.config.dir, Some(PathBuf::from("/tmp/locks")));
            assert_eq!(args.config.config, Some(PathBuf::from("lockrelay.yaml")));
            assert_eq!(args.config.timeout_ms, Some(1000));
            assert_eq!(args.interval_ms, Some(250));
            assert!(args.once);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["lockrelay", "status", "--dir", "locks"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.config.dir, Some(PathBuf::from("locks")));
        } else {
            panic!("Expected Status command");
        }
    }

    #[test]
    fn parse_clear_requires_name() {
        assert!(Cli::try_parse_from(["lockrelay", "clear"]).is_err());

        let cli = Cli::try_parse_from(["lockrelay", "clear", "lockfile3", "--force"]).unwrap();
        if let Command::Clear(args) = cli.command {
            assert_eq!(args.lock_name, "lockfile3");
            assert!(args.force);
        } else {
            panic!("Expected Clear command");
        }
    }
}
