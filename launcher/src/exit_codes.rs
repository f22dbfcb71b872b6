//! Stable exit codes for launcher-level failures.
//!
//! When the child runs, the launcher exits with the child's own code instead.
//! These values sit above the range scripts conventionally use so callers can
//! tell a launcher failure from a script failure.

/// Invalid usage or configuration.
pub const INVALID: i32 = 120;
/// The target script could not be opened or read.
pub const SCRIPT_UNREADABLE: i32 = 121;
/// The directive (read or synthesized) is oversized or malformed.
pub const MALFORMED_HEADER: i32 = 122;
/// A version tag matched no installed interpreter.
pub const INTERPRETER_NOT_FOUND: i32 = 123;
/// An explicit interpreter path does not exist.
pub const PATH_NOT_FOUND: i32 = 124;
/// No directory on the search path holds the named command.
pub const SEARCH_EXHAUSTED: i32 = 125;
/// The child process could not be started or waited on.
pub const PROCESS_CREATION_FAILED: i32 = 126;
/// Base added to a terminating signal number (unix convention).
pub const SIGNAL_BASE: i32 = 128;
