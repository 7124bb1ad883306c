//! Error types for lockrelay.
//!
//! Uses thiserror for derive macros. Lock-protocol failures live in
//! [`LockError`]; everything that can end a CLI invocation is a
//! [`LockRelayError`] with its own exit code.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the lock protocol itself.
///
/// Any of these aborts the current tick. The caller must not assume it owns
/// a lock after seeing one.
#[derive(Error, Debug)]
pub enum LockError {
    /// The lock directory could not be listed or an entry could not be read.
    #[error("lock directory '{}' failed: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A name matched the lock-file pattern but its digits are not a valid
    /// sequence number.
    #[error("malformed lock file name '{0}'")]
    MalformedLockName(String),

    /// The latest lock already carries the largest representable sequence.
    #[error("lock sequence exhausted at '{0}'")]
    SequenceExhausted(String),
}

/// Main error type for lockrelay operations.
#[derive(Error, Debug)]
pub enum LockRelayError {
    /// User provided invalid arguments or asked for a refused operation.
    #[error("{0}")]
    UserError(String),

    /// Configuration could not be loaded or failed validation.
    #[error("config error: {0}")]
    ConfigError(String),

    /// Lock protocol failure.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl LockRelayError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockRelayError::UserError(_) => exit_codes::USER_ERROR,
            LockRelayError::ConfigError(_) => exit_codes::CONFIG_FAILURE,
            LockRelayError::Lock(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for lockrelay operations.
pub type Result<T> = std::result::Result<T, LockRelayError>;
