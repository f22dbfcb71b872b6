//! Platform abstraction for environment access, spawning, and signal relay.
//!
//! The operating-system specific half lives in one `sys` module chosen at
//! build time. Everything else in the crate talks to [`Platform`], which also
//! lets tests substitute a fake launcher location, environment, and signal
//! source.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::debug;

use crate::core::compose::ChildInvocation;

#[cfg(unix)]
#[path = "unix.rs"]
mod sys;

#[cfg(not(unix))]
#[path = "other.rs"]
mod sys;

pub use sys::{DEFAULT_FALLBACK_INTERPRETER, DEFAULT_SEARCH_EXTENSIONS};

/// Signals intercepted on behalf of a running child.
pub trait PendingSignals {
    /// Take the next intercepted signal, if one arrived since the last call.
    fn take(&self) -> Option<i32>;
}

/// Operating-system services the launcher pipeline depends on.
pub trait Platform {
    /// Absolute path of the running launcher executable.
    fn launcher_path(&self) -> io::Result<PathBuf>;

    fn current_dir(&self) -> io::Result<PathBuf>;

    fn read_env(&self, key: &str) -> Option<OsString>;

    /// Start the child with inherited standard streams.
    fn spawn(&self, invocation: &ChildInvocation) -> io::Result<Child>;

    /// Begin intercepting interrupt/termination signals aimed at the launcher.
    /// Interception ends when the returned value is dropped.
    fn intercept_signals(&self) -> io::Result<Box<dyn PendingSignals>>;

    fn forward_signal(&self, child: &Child, signal: i32) -> io::Result<()>;

    /// Exit code the launcher should report for a finished child.
    fn exit_code(&self, status: ExitStatus) -> i32;
}

/// The real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn launcher_path(&self) -> io::Result<PathBuf> {
        std::env::current_exe()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn read_env(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn spawn(&self, invocation: &ChildInvocation) -> io::Result<Child> {
        debug!(command_line = %invocation.command_line(), "spawning child");
        Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
    }

    fn intercept_signals(&self) -> io::Result<Box<dyn PendingSignals>> {
        Ok(Box::new(sys::intercept()?))
    }

    fn forward_signal(&self, child: &Child, signal: i32) -> io::Result<()> {
        sys::send_signal(child.id(), signal)
    }

    fn exit_code(&self, status: ExitStatus) -> i32 {
        sys::exit_code(status)
    }
}
