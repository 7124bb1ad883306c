//! Exit code constants for the lockrelay CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, refused operation)
//! - 2: Configuration error (unreadable or invalid config file)
//! - 3: Lock directory failure (I/O error, malformed lock name)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a refused operation.
pub const USER_ERROR: i32 = 1;

/// Configuration could not be read, parsed or validated.
pub const CONFIG_FAILURE: i32 = 2;

/// The lock directory could not be read or is in an unexpected state.
pub const LOCK_FAILURE: i32 = 3;
