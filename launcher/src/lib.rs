//! Script launcher: runs a script through the interpreter its first line names.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (byte-order marks, line
//!   extraction, directive parsing, version selection, command composition).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (reading headers, config, path
//!   resolution, spawning and supervising the child). Platform access goes
//!   through [`io::platform::Platform`] so tests can substitute it.
//!
//! [`launch`] wires the stages together for the CLI.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod launch;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
