//! Server inventory domain types.
//!
//! These types are shared between the core services and any front end,
//! so they all carry serde derives with lowercase wire names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Authority a server entry was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerSource {
    /// Declared in the desktop assistant's configuration file.
    Assistant,
    /// Declared in the editor's settings file.
    Editor,
    /// Discovered in the process table with a recognizable identity.
    System,
    /// Discovered in the process table, identity unclear.
    Unknown,
}

impl ServerSource {
    /// True for entries that were discovered rather than declared.
    #[must_use]
    pub const fn is_discovered(self) -> bool {
        matches!(self, Self::System | Self::Unknown)
    }
}

/// A configured server as declared by one authority.
///
/// Immutable snapshot: recreated on every read of its source, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Name the authority assigned to the server.
    pub name: String,
    /// Executable or interpreter to launch.
    pub command: String,
    /// Launch arguments, in declaration order.
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables for the launched process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Which authority declared this server.
    pub source: ServerSource,
    /// Path of the configuration file the entry came from.
    pub config_path: String,
}

impl ServerDescriptor {
    /// Create a descriptor with no args or env.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        source: ServerSource,
        config_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: None,
            source,
            config_path: config_path.into(),
        }
    }

    /// Set the launch arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A live OS process as seen in one point-in-time snapshot.
///
/// The pid is unique within a snapshot but may be recycled by the OS
/// across snapshots, so it is never a durable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// OS process id.
    pub pid: u32,
    /// Executable as reported by the process table (argv[0]).
    pub command: String,
    /// Remaining argument vector.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProcessRecord {
    /// Create a process record.
    pub fn new(pid: u32, command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            pid,
            command: command.into(),
            args,
        }
    }
}

/// The reconciled, user-facing unit: one server as the inventory knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningServerEntry {
    /// Server name (declared, or derived for discovered processes).
    pub name: String,
    /// Live pid, or 0 for configured-but-not-running.
    pub pid: u32,
    /// Command the entry launches (or was observed running) with.
    pub command: String,
    /// Argument vector.
    #[serde(default)]
    pub args: Vec<String>,
    /// Authority the entry belongs to.
    pub source: ServerSource,
    /// Configuration file backing the entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

impl RunningServerEntry {
    /// True when the entry is backed by a live process.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.pid > 0
    }
}

/// Input that produced a warning during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSource {
    /// The assistant configuration file.
    Assistant,
    /// The editor settings file.
    Editor,
    /// The OS process table.
    Processes,
}

/// Soft warning attached to a partial reconciliation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceWarning {
    /// Which input degraded.
    pub source: WarningSource,
    /// Human-readable reason.
    pub message: String,
}

impl SourceWarning {
    /// Create a warning for one degraded input.
    pub fn new(source: WarningSource, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}

/// The reconciliation result: one coherent view over all authorities.
///
/// `running` holds every live entry (matched or discovered); the split
/// lists additionally carry pid-0 rows for configured-but-not-running
/// servers. Replaced wholesale on every reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInventory {
    /// Every entry backed by a live process, deterministic order:
    /// assistant matches first, then editor, then discovered entries
    /// in process-snapshot order.
    pub running: Vec<RunningServerEntry>,
    /// All assistant-declared servers, declaration order.
    pub assistant_servers: Vec<RunningServerEntry>,
    /// All editor-declared servers, declaration order.
    pub editor_servers: Vec<RunningServerEntry>,
    /// Warnings for inputs that failed to load this cycle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SourceWarning>,
}

impl SystemInventory {
    /// Look up a declared entry by name, assistant source first.
    #[must_use]
    pub fn find_declared(&self, name: &str) -> Option<&RunningServerEntry> {
        self.assistant_servers
            .iter()
            .chain(self.editor_servers.iter())
            .find(|entry| entry.name == name)
    }

    /// Look up a live entry by name across the whole inventory.
    #[must_use]
    pub fn find_running(&self, name: &str) -> Option<&RunningServerEntry> {
        self.running.iter().find(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_builder() {
        let desc = ServerDescriptor::new(
            "filesystem",
            "node",
            ServerSource::Assistant,
            "/tmp/config.json",
        )
        .with_args(vec!["/opt/mcp/fs.js".to_string()])
        .with_env("MCP_ROOT", "/srv");

        assert_eq!(desc.args, vec!["/opt/mcp/fs.js"]);
        assert_eq!(
            desc.env.as_ref().and_then(|e| e.get("MCP_ROOT")).unwrap(),
            "/srv"
        );
    }

    #[test]
    fn entry_running_state() {
        let entry = RunningServerEntry {
            name: "fs".to_string(),
            pid: 0,
            command: "node".to_string(),
            args: vec![],
            source: ServerSource::Assistant,
            config_path: None,
        };
        assert!(!entry.is_running());
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&ServerSource::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert!(ServerSource::System.is_discovered());
        assert!(!ServerSource::Editor.is_discovered());
    }

    #[test]
    fn find_declared_prefers_assistant() {
        let mk = |source| RunningServerEntry {
            name: "dup".to_string(),
            pid: 0,
            command: "node".to_string(),
            args: vec![],
            source,
            config_path: None,
        };
        let inventory = SystemInventory {
            running: vec![],
            assistant_servers: vec![mk(ServerSource::Assistant)],
            editor_servers: vec![mk(ServerSource::Editor)],
            warnings: vec![],
        };
        assert_eq!(
            inventory.find_declared("dup").unwrap().source,
            ServerSource::Assistant
        );
    }
}
