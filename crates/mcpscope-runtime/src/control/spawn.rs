//! Detached process spawning.

use std::collections::BTreeMap;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use mcpscope_core::ports::ControlError;

/// Launch a command as a detached child and return its pid.
///
/// The child gets no stdio and (on Unix) its own process group, so it
/// neither blocks the caller nor dies with it. A reaper task waits on
/// the handle to avoid leaving zombies when the child exits.
pub(crate) fn spawn_detached(
    command: &str,
    args: &[String],
    env: Option<&BTreeMap<String, String>>,
) -> Result<u32, ControlError> {
    let mut cmd = Command::new(command);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if let Some(env) = env {
        for (key, value) in env {
            cmd.env(key, value);
        }
    }

    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(|e| ControlError::Launch {
        command: command.to_string(),
        reason: e.to_string(),
    })?;

    let pid = child.id().ok_or_else(|| ControlError::Launch {
        command: command.to_string(),
        reason: "child exited before a pid could be read".to_string(),
    })?;

    debug!(pid, command = %command, "spawned detached process");

    // Reap whenever the child eventually exits.
    tokio::spawn(async move {
        let _ = child.wait().await;
    });

    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_returns_live_pid() {
        let pid = spawn_detached("sleep", &["5".to_string()], None).unwrap();
        assert!(pid > 0);

        // Clean up.
        let _ = crate::control::signal::send_signal(
            pid,
            mcpscope_core::ports::SignalMode::Forceful,
        );
    }

    #[tokio::test]
    async fn spawn_missing_binary_fails_with_launch() {
        let err = spawn_detached("/definitely/not/here/mcpscope-test-binary", &[], None)
            .unwrap_err();
        assert!(matches!(err, ControlError::Launch { .. }));
    }

    #[tokio::test]
    async fn spawn_passes_environment() {
        let mut env = BTreeMap::new();
        env.insert("MCPSCOPE_TEST_MARKER".to_string(), "1".to_string());
        // `env` exits immediately; success is all this asserts.
        let pid = spawn_detached("env", &[], Some(&env)).unwrap();
        assert!(pid > 0);
    }
}
