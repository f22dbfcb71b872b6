//! Unix signal interception and relay.

#![allow(unsafe_code)]

use std::io;
use std::mem;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};

use super::PendingSignals;
use crate::exit_codes;

pub const DEFAULT_FALLBACK_INTERPRETER: &str = "bin/python";
pub const DEFAULT_SEARCH_EXTENSIONS: &[&str] = &[""];

const INTERCEPTED: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

/// Pending signals, one bit per signal number. Every intercepted number is below 32.
static PENDING: AtomicU32 = AtomicU32::new(0);

fn signal_bit(signal: libc::c_int) -> u32 {
    1 << signal
}

extern "C" fn on_signal(
    signal: libc::c_int,
    info: *mut libc::siginfo_t,
    _context: *mut libc::c_void,
) {
    if raised_by_process(info) {
        PENDING.fetch_or(signal_bit(signal), Ordering::SeqCst);
    }
}

/// Terminal-generated signals already reach every process in the foreground
/// group, the child included; only relay those sent by another process.
#[cfg(target_os = "linux")]
fn raised_by_process(info: *const libc::siginfo_t) -> bool {
    // SI_USER, SI_QUEUE and SI_TKILL are <= 0; the tty driver uses SI_KERNEL.
    // SAFETY: the kernel passes a valid siginfo_t when SA_SIGINFO is set.
    info.is_null() || unsafe { (*info).si_code } <= 0
}

#[cfg(not(target_os = "linux"))]
fn raised_by_process(_info: *const libc::siginfo_t) -> bool {
    true
}

/// Installed handlers; the previous dispositions come back on drop.
pub struct Interceptor {
    previous: Vec<(libc::c_int, libc::sigaction)>,
}

pub fn intercept() -> io::Result<Interceptor> {
    PENDING.store(0, Ordering::SeqCst);
    let handler: extern "C" fn(libc::c_int, *mut libc::siginfo_t, *mut libc::c_void) =
        on_signal;
    let mut interceptor = Interceptor {
        previous: Vec::with_capacity(INTERCEPTED.len()),
    };
    for signal in INTERCEPTED {
        // SAFETY: the handler only stores into an atomic, which is async-signal-safe.
        let previous = unsafe {
            let mut action: libc::sigaction = mem::zeroed();
            action.sa_sigaction = handler as libc::sighandler_t;
            action.sa_flags = libc::SA_SIGINFO | libc::SA_RESTART;
            libc::sigemptyset(&mut action.sa_mask);
            let mut previous: libc::sigaction = mem::zeroed();
            if libc::sigaction(signal, &action, &mut previous) != 0 {
                return Err(io::Error::last_os_error());
            }
            previous
        };
        interceptor.previous.push((signal, previous));
    }
    Ok(interceptor)
}

impl PendingSignals for Interceptor {
    /// Lowest pending signal number first. Handlers only ever set bits, so
    /// clearing this one bit cannot lose a signal that arrives meanwhile.
    fn take(&self) -> Option<i32> {
        let pending = PENDING.load(Ordering::SeqCst);
        if pending == 0 {
            return None;
        }
        let signal = pending.trailing_zeros() as libc::c_int;
        PENDING.fetch_and(!signal_bit(signal), Ordering::SeqCst);
        Some(signal)
    }
}

impl Drop for Interceptor {
    fn drop(&mut self) {
        for (signal, previous) in self.previous.iter().rev() {
            // SAFETY: restores a disposition previously returned by sigaction.
            unsafe {
                libc::sigaction(*signal, previous, ptr::null_mut());
            }
        }
    }
}

/// Send `signal` to `pid`. A child that already exited is not an error.
pub fn send_signal(pid: u32, signal: i32) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: kill has no memory-safety preconditions.
    if unsafe { libc::kill(pid, signal) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        return Ok(());
    }
    Err(err)
}

/// The child's exit code, or `128 + N` when signal N terminated it.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|signal| exit_codes::SIGNAL_BASE + signal))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_maps_signals_above_base() {
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(libc::SIGTERM)), 128 + 15);
    }

    // Handlers are process-wide, so every raise() check lives in this one test.
    #[test]
    fn raised_signals_are_intercepted_not_fatal() {
        let interceptor = intercept().expect("intercept");
        // SAFETY: the interceptor's handlers are installed for both signals.
        unsafe {
            assert_eq!(libc::raise(libc::SIGTERM), 0);
        }
        assert_eq!(interceptor.take(), Some(libc::SIGTERM));
        assert_eq!(interceptor.take(), None);

        // SAFETY: as above.
        unsafe {
            assert_eq!(libc::raise(libc::SIGTERM), 0);
            assert_eq!(libc::raise(libc::SIGINT), 0);
        }
        assert_eq!(interceptor.take(), Some(libc::SIGINT));
        assert_eq!(interceptor.take(), Some(libc::SIGTERM));
        assert_eq!(interceptor.take(), None);
    }
}
