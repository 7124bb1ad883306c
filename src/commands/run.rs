//! Implementation of the `lockrelay run` command.
//!
//! Runs the acquire → work → release cycle on a fixed delay until Ctrl-C.
//! With `--once`, a single cycle runs and a lock-directory failure becomes
//! the process exit code instead of a logged error.

use super::resolve_config;
use crate::cli::RunArgs;
use crate::clock::SystemClock;
use crate::error::{LockRelayError, Result};
use crate::locks::{DirStore, LockCoordinator};
use crate::worker::{self, SimulatedWork};

pub fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = resolve_config(&args.config)?;
    if let Some(interval_ms) = args.interval_ms {
        config.poll_interval_ms = interval_ms;
        config.validate()?;
    }

    std::fs::create_dir_all(&config.lock_dir).map_err(|e| {
        LockRelayError::UserError(format!(
            "failed to create lock directory '{}': {}",
            config.lock_dir.display(),
            e
        ))
    })?;

    let span = tracing::info_span!("worker", instance = %worker::instance_id());
    let _enter = span.enter();

    let coordinator = LockCoordinator::new(
        DirStore::new(&config.lock_dir),
        SystemClock,
        config.lock_timeout(),
    );
    let mut work = SimulatedWork::from_config(&config);

    tracing::info!(
        dir = %config.lock_dir.display(),
        timeout_ms = config.lock_timeout_ms,
        interval_ms = config.poll_interval_ms,
        "worker started"
    );

    if args.once {
        let report = worker::run_cycle(&coordinator, &mut work)?;
        tracing::info!(worked = report.worked(), "single cycle finished");
        return Ok(());
    }

    let running = worker::install_ctrlc_handler()?;
    let cycles = worker::run_loop(
        &coordinator,
        &mut work,
        &running,
        config.poll_interval(),
        None,
    );

    tracing::info!(cycles, "worker stopped");
    Ok(())
}
