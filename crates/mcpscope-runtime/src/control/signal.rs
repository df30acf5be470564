//! Signal delivery with ESRCH mapped to a distinct error.

use mcpscope_core::ports::{ControlError, SignalMode};

/// Deliver a termination signal to a pid.
///
/// # Platform behavior
/// - Unix: `SIGTERM` for graceful, `SIGKILL` for forceful; a pid that
///   no longer exists surfaces as [`ControlError::ProcessNotFound`] so
///   callers can treat termination as idempotent.
/// - Other: not implemented; returns [`ControlError::Unsupported`].
#[cfg(unix)]
pub(crate) fn send_signal(pid: u32, mode: SignalMode) -> Result<(), ControlError> {
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let sig = match mode {
        SignalMode::Graceful => Signal::SIGTERM,
        SignalMode::Forceful => Signal::SIGKILL,
    };

    match signal::kill(Pid::from_raw(pid as i32), sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => Err(ControlError::ProcessNotFound(pid)),
        Err(e) => Err(ControlError::Signal {
            pid,
            reason: e.to_string(),
        }),
    }
}

#[cfg(not(unix))]
pub(crate) fn send_signal(pid: u32, _mode: SignalMode) -> Result<(), ControlError> {
    let _ = pid;
    Err(ControlError::Unsupported(
        "signal delivery is only implemented on Unix".to_string(),
    ))
}
