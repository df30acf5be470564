//! Process control port: spawn and signal.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// How a termination signal should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMode {
    /// Ask the process to exit (SIGTERM on Unix).
    Graceful,
    /// Terminate immediately (SIGKILL on Unix).
    Forceful,
}

/// Errors from spawning or signalling processes.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Process creation failed (missing binary, permissions).
    #[error("failed to launch '{command}': {reason}")]
    Launch { command: String, reason: String },

    /// The target pid no longer exists.
    ///
    /// Callers terminating a process treat this as success: the goal
    /// state is already reached.
    #[error("process {0} not found")]
    ProcessNotFound(u32),

    /// Sending the signal failed for another reason (permissions).
    #[error("failed to signal process {pid}: {reason}")]
    Signal { pid: u32, reason: String },

    /// The operation is not available on this platform.
    #[error("process control unsupported on this platform: {0}")]
    Unsupported(String),
}

/// Port for launching and terminating server processes.
#[async_trait]
pub trait ProcessControlPort: Send + Sync {
    /// Launch a detached process and return its pid.
    ///
    /// The child must not inherit stdio and must outlive the caller.
    async fn spawn(
        &self,
        command: &str,
        args: &[String],
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<u32, ControlError>;

    /// Deliver a termination signal to a pid.
    async fn signal(&self, pid: u32, mode: SignalMode) -> Result<(), ControlError>;
}
