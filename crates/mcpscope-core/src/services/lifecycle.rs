//! Lifecycle controller: start/stop/kill/uninstall against the
//! reconciled inventory.
//!
//! Mutations never touch the inventory directly. Every operation ends
//! with a refresh request, whatever its outcome, so the displayed state
//! never silently diverges from reality.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::inventory::InventoryService;
use super::refresh::RefreshCoordinator;
use crate::domain::ServerSource;
use crate::ports::{ConfigSourceError, ConfigStorePort, ControlError, ProcessControlPort, SignalMode};

/// Failures of lifecycle operations, surfaced to the caller unretried.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The name is not declared by any configuration source.
    #[error("server '{0}' is not configured in any source")]
    UnknownServer(String),

    /// Start refused: an entry with this identity is already alive.
    #[error("server '{name}' is already running (pid {pid})")]
    AlreadyRunning { name: String, pid: u32 },

    /// Stop refused: the server is configured but has no live process.
    #[error("server '{0}' is not running")]
    NotRunning(String),

    /// Process creation failed (missing binary, permissions).
    #[error("failed to launch '{name}': {reason}")]
    Launch { name: String, reason: String },

    /// Signalling an existing process failed (permissions).
    #[error("failed to stop pid {pid}: {reason}")]
    Stop { pid: u32, reason: String },

    /// The owning configuration file could not be rewritten.
    #[error("config update failed: {0}")]
    ConfigWrite(String),
}

/// Executes control operations and hands the aftermath to the
/// refresh coordinator.
pub struct LifecycleService {
    inventory: Arc<InventoryService>,
    coordinator: Arc<RefreshCoordinator>,
    control: Arc<dyn ProcessControlPort>,
    assistant_store: Arc<dyn ConfigStorePort>,
}

impl LifecycleService {
    /// Create a lifecycle service.
    pub fn new(
        inventory: Arc<InventoryService>,
        coordinator: Arc<RefreshCoordinator>,
        control: Arc<dyn ProcessControlPort>,
        assistant_store: Arc<dyn ConfigStorePort>,
    ) -> Self {
        Self {
            inventory,
            coordinator,
            control,
            assistant_store,
        }
    }

    /// Launch the named configured server as a detached process.
    ///
    /// Returns the new pid.
    pub async fn start(&self, name: &str) -> Result<u32, LifecycleError> {
        let result = self.start_inner(name).await;
        self.coordinator.request_refresh().await;
        result
    }

    /// Gracefully stop the named server's live process.
    ///
    /// A process that exits between lookup and signal counts as
    /// success: the goal state is reached either way.
    pub async fn stop(&self, name: &str) -> Result<(), LifecycleError> {
        let result = self.stop_inner(name).await;
        self.coordinator.request_refresh().await;
        result
    }

    /// Forcefully terminate a process by pid, bypassing name lookup.
    ///
    /// This is the only control path for discovered (`System`/`Unknown`)
    /// entries, which have no backing descriptor. Idempotent: a pid that
    /// no longer exists is success.
    pub async fn kill(&self, pid: u32) -> Result<(), LifecycleError> {
        let result = self.kill_inner(pid).await;
        self.coordinator.request_refresh().await;
        result
    }

    /// Remove the named server from its owning configuration source,
    /// stopping it first if it is running.
    ///
    /// The config rewrite happens before any signal is sent: when the
    /// rewrite fails the process is left untouched, so there is never a
    /// half-done uninstall without a clear reported outcome.
    pub async fn uninstall(&self, name: &str) -> Result<(), LifecycleError> {
        let result = self.uninstall_inner(name).await;
        self.coordinator.request_refresh().await;
        result
    }

    async fn start_inner(&self, name: &str) -> Result<u32, LifecycleError> {
        let inventory = self.coordinator.refresh_now().await;
        if let Some(entry) = inventory.find_running(name) {
            return Err(LifecycleError::AlreadyRunning {
                name: name.to_string(),
                pid: entry.pid,
            });
        }

        // Inventory entries drop the env mapping; go back to the
        // descriptors for the full launch spec.
        let descriptors = self.inventory.load_descriptors().await;
        let descriptor = descriptors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| LifecycleError::UnknownServer(name.to_string()))?;

        let pid = self
            .control
            .spawn(&descriptor.command, &descriptor.args, descriptor.env.as_ref())
            .await
            .map_err(|e| LifecycleError::Launch {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        info!(name = %name, pid, command = %descriptor.command, "started server");
        Ok(pid)
    }

    async fn stop_inner(&self, name: &str) -> Result<(), LifecycleError> {
        let inventory = self.coordinator.refresh_now().await;
        let Some(entry) = inventory.find_running(name) else {
            if inventory.find_declared(name).is_some() {
                return Err(LifecycleError::NotRunning(name.to_string()));
            }
            return Err(LifecycleError::UnknownServer(name.to_string()));
        };

        match self.control.signal(entry.pid, SignalMode::Graceful).await {
            Ok(()) => {
                info!(name = %name, pid = entry.pid, "stopped server");
                Ok(())
            }
            Err(ControlError::ProcessNotFound(pid)) => {
                debug!(name = %name, pid, "process already gone");
                Ok(())
            }
            Err(e) => Err(LifecycleError::Stop {
                pid: entry.pid,
                reason: e.to_string(),
            }),
        }
    }

    async fn kill_inner(&self, pid: u32) -> Result<(), LifecycleError> {
        match self.control.signal(pid, SignalMode::Forceful).await {
            Ok(()) => {
                info!(pid, "killed process");
                Ok(())
            }
            Err(ControlError::ProcessNotFound(_)) => {
                debug!(pid, "process already gone");
                Ok(())
            }
            Err(e) => Err(LifecycleError::Stop {
                pid,
                reason: e.to_string(),
            }),
        }
    }

    async fn uninstall_inner(&self, name: &str) -> Result<(), LifecycleError> {
        let inventory = self.coordinator.refresh_now().await;
        let entry = inventory
            .find_declared(name)
            .ok_or_else(|| LifecycleError::UnknownServer(name.to_string()))?
            .clone();

        match entry.source {
            ServerSource::Assistant => {}
            ServerSource::Editor => {
                return Err(LifecycleError::ConfigWrite(format!(
                    "'{name}' belongs to the editor settings, which mcpscope does not rewrite; \
                     remove the entry in the editor"
                )));
            }
            // Declared lists never carry discovered sources.
            ServerSource::System | ServerSource::Unknown => {
                return Err(LifecycleError::UnknownServer(name.to_string()));
            }
        }

        match self.assistant_store.remove_server(name).await {
            Ok(()) => {}
            // Entry vanished since the refresh: the goal state holds.
            Err(ConfigSourceError::NoSuchServer(_)) => {
                debug!(name = %name, "config entry already absent");
            }
            Err(e) => return Err(LifecycleError::ConfigWrite(e.to_string())),
        }

        if entry.is_running() {
            match self.control.signal(entry.pid, SignalMode::Graceful).await {
                Ok(()) | Err(ControlError::ProcessNotFound(_)) => {}
                Err(e) => {
                    // Config entry is gone; report the leftover process.
                    warn!(name = %name, pid = entry.pid, error = %e, "uninstalled but stop failed");
                    return Err(LifecycleError::Stop {
                        pid: entry.pid,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(name = %name, "uninstalled server");
        Ok(())
    }
}
