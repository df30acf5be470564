//! Process spawn and signal plumbing.

mod signal;
mod spawn;

use std::collections::BTreeMap;

use async_trait::async_trait;

use mcpscope_core::ports::{ControlError, ProcessControlPort, SignalMode};

/// Process control backed by the host OS.
///
/// Spawns detach into their own process group with stdio closed;
/// signals are delivered with `SIGTERM`/`SIGKILL` on Unix.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProcessControl;

impl DefaultProcessControl {
    /// Create a process controller.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessControlPort for DefaultProcessControl {
    async fn spawn(
        &self,
        command: &str,
        args: &[String],
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<u32, ControlError> {
        spawn::spawn_detached(command, args, env)
    }

    async fn signal(&self, pid: u32, mode: SignalMode) -> Result<(), ControlError> {
        signal::send_signal(pid, mode)
    }
}
