//! Core domain types and port definitions for mcpscope.
//!
//! mcpscope merges MCP server descriptions from three authorities (the
//! desktop assistant's config file, the editor's settings file, and the
//! live OS process table) into one coherent inventory, and exposes
//! lifecycle control (start/stop/kill/uninstall) that keeps that view
//! consistent.
//!
//! This crate is pure: all I/O lives behind the ports in [`ports`], and
//! the reconciliation pipeline in [`reconcile`] is a deterministic
//! function of its inputs.

pub mod domain;
pub mod ports;
pub mod reconcile;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    ProcessRecord, RunningServerEntry, ServerDescriptor, ServerSource, SourceWarning,
    SystemInventory, WarningSource,
};
pub use ports::{
    ConfigSourceError, ConfigSourcePort, ConfigStorePort, ControlError, ProcessControlPort,
    ProcessSnapshotPort, SignalMode, SnapshotError,
};
pub use reconcile::{MatcherConfig, reconcile};
pub use services::{InventoryService, LifecycleError, LifecycleService, RefreshCoordinator};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
