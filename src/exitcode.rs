//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination, also used after printing help or version
pub const OK: i32 = 0;

/// Generic failure reported by a command action
pub const FAILURE: i32 = 1;

/// Command line usage error (unknown command, bad flags)
pub const USAGE: i32 = 64;

/// Internal software error (invalid command tree)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
