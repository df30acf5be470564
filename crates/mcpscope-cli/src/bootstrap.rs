//! CLI bootstrap - the composition root.
//!
//! The ONLY place where infrastructure is wired together: adapters from
//! mcpscope-runtime are instantiated here and injected into the core
//! services. Command handlers receive the composed context and delegate
//! everything to it.

use std::sync::Arc;

use anyhow::Result;

use mcpscope_core::reconcile::MatcherConfig;
use mcpscope_core::services::{InventoryService, LifecycleService, RefreshCoordinator};
use mcpscope_runtime::{
    AssistantConfigFile, DefaultProcessControl, EditorSettingsFile, SysinfoSnapshot,
    assistant_config_path, editor_settings_path,
};

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Refresh coordinator owning the current inventory.
    pub coordinator: Arc<RefreshCoordinator>,
    /// Lifecycle operations (start/stop/kill/uninstall).
    pub lifecycle: LifecycleService,
    /// Process-table access for the `info` command.
    pub snapshot: SysinfoSnapshot,
}

/// Wire adapters into services using platform config locations.
pub fn bootstrap() -> Result<CliContext> {
    let assistant = Arc::new(AssistantConfigFile::new(assistant_config_path()?));
    let editor = Arc::new(EditorSettingsFile::new(editor_settings_path()?));
    let snapshot = SysinfoSnapshot::new();

    let inventory = Arc::new(InventoryService::new(
        Arc::new(snapshot),
        assistant.clone(),
        editor,
        MatcherConfig::default(),
    ));
    let coordinator = RefreshCoordinator::new(inventory.clone());
    let lifecycle = LifecycleService::new(
        inventory,
        coordinator.clone(),
        Arc::new(DefaultProcessControl::new()),
        assistant,
    );

    Ok(CliContext {
        coordinator,
        lifecycle,
        snapshot,
    })
}
