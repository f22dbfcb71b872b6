//! Run the composed child, relay signals to it, and report its exit code.

use std::time::Duration;

use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::compose::ChildInvocation;
use crate::error::LaunchError;
use crate::io::platform::Platform;

/// Spawn `invocation` and block until it exits, returning the exit code the
/// launcher should terminate with.
///
/// Signals aimed at the launcher while the child runs are relayed to the child
/// and waiting continues, so the code always reflects how the child ended.
#[instrument(skip_all, fields(program = %invocation.program.display(), poll_ms = poll.as_millis() as u64))]
pub fn supervise(
    platform: &dyn Platform,
    invocation: &ChildInvocation,
    poll: Duration,
) -> Result<i32, LaunchError> {
    let signals = platform
        .intercept_signals()
        .map_err(|source| LaunchError::Supervise { source })?;

    let mut child = match platform.spawn(invocation) {
        Ok(child) => child,
        Err(source) => {
            error!(err = %source, "failed to spawn child");
            return Err(LaunchError::ProcessCreation {
                program: invocation.program.clone(),
                source,
            });
        }
    };
    debug!(pid = child.id(), "child started");

    loop {
        while let Some(signal) = signals.take() {
            debug!(signal, "relaying signal to child");
            if let Err(err) = platform.forward_signal(&child, signal) {
                warn!(signal, err = %err, "failed to relay signal");
            }
        }
        match child.wait_timeout(poll) {
            Ok(Some(status)) => {
                let code = platform.exit_code(status);
                debug!(code, "child exited");
                return Ok(code);
            }
            Ok(None) => {}
            Err(source) => return Err(LaunchError::Supervise { source }),
        }
    }
}
