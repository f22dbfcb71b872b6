//! Fallback for targets without unix signals.
//!
//! Console interrupts reach every process attached to the console, so there
//! is nothing to intercept or relay here.

use std::io;
use std::process::ExitStatus;

use super::PendingSignals;

pub const DEFAULT_FALLBACK_INTERPRETER: &str = "python.exe";
pub const DEFAULT_SEARCH_EXTENSIONS: &[&str] = &["", ".exe", ".com", ".bat", ".cmd"];

pub struct Interceptor;

pub fn intercept() -> io::Result<Interceptor> {
    Ok(Interceptor)
}

impl PendingSignals for Interceptor {
    fn take(&self) -> Option<i32> {
        None
    }
}

pub fn send_signal(_pid: u32, _signal: i32) -> io::Result<()> {
    Ok(())
}

pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
