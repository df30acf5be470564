//! Desktop assistant configuration adapter.
//!
//! The assistant stores its servers in one JSON file under an
//! `mcpServers` object keyed by server name. This adapter is the only
//! mutable source: rewrites go through a sibling temp file plus rename
//! so readers never observe a half-written config, and unrelated
//! top-level keys (the assistant owns more than servers) are preserved.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, info, warn};

use mcpscope_core::domain::{ServerDescriptor, ServerSource};
use mcpscope_core::ports::{ConfigSourceError, ConfigSourcePort, ConfigStorePort};

/// One server's launch spec as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LaunchSpec {
    command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    env: Option<BTreeMap<String, String>>,
}

/// The assistant config file: the servers object plus whatever else
/// the assistant keeps there.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AssistantConfig {
    #[serde(default, rename = "mcpServers")]
    mcp_servers: Map<String, Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Adapter over the assistant's configuration file.
pub struct AssistantConfigFile {
    path: PathBuf,
}

impl AssistantConfigFile {
    /// Create an adapter for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_config(&self) -> Result<AssistantConfig, ConfigSourceError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // Not installed yet: an empty config, not an error.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "assistant config missing, treating as empty");
                return Ok(AssistantConfig::default());
            }
            Err(e) => {
                return Err(ConfigSourceError::Unreadable {
                    path: self.path_string(),
                    reason: e.to_string(),
                });
            }
        };
        serde_json::from_str(&raw).map_err(|e| ConfigSourceError::Unreadable {
            path: self.path_string(),
            reason: e.to_string(),
        })
    }

    /// Rewrite the whole file atomically: temp file in the same
    /// directory, then rename over the original.
    async fn write_config(&self, config: &AssistantConfig) -> Result<(), ConfigSourceError> {
        let write_failed = |reason: String| ConfigSourceError::WriteFailed {
            path: self.path_string(),
            reason,
        };

        let mut serialized =
            serde_json::to_string_pretty(config).map_err(|e| write_failed(e.to_string()))?;
        serialized.push('\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)
            .await
            .map_err(|e| write_failed(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }

    fn descriptor_from(&self, name: &str, value: &Value) -> Option<ServerDescriptor> {
        match serde_json::from_value::<LaunchSpec>(value.clone()) {
            Ok(spec) => {
                let mut descriptor = ServerDescriptor::new(
                    name,
                    spec.command,
                    ServerSource::Assistant,
                    self.path_string(),
                )
                .with_args(spec.args);
                descriptor.env = spec.env;
                Some(descriptor)
            }
            Err(e) => {
                warn!(name = %name, error = %e, "skipping malformed server entry");
                None
            }
        }
    }
}

#[async_trait]
impl ConfigSourcePort for AssistantConfigFile {
    fn source(&self) -> ServerSource {
        ServerSource::Assistant
    }

    fn config_path(&self) -> String {
        self.path_string()
    }

    async fn load(&self) -> Result<Vec<ServerDescriptor>, ConfigSourceError> {
        let config = self.read_config().await?;
        Ok(config
            .mcp_servers
            .iter()
            .filter_map(|(name, value)| self.descriptor_from(name, value))
            .collect())
    }
}

#[async_trait]
impl ConfigStorePort for AssistantConfigFile {
    async fn add_server(&self, descriptor: &ServerDescriptor) -> Result<(), ConfigSourceError> {
        let mut config = self.read_config().await?;
        let spec = LaunchSpec {
            command: descriptor.command.clone(),
            args: descriptor.args.clone(),
            env: descriptor.env.clone(),
        };
        let value = serde_json::to_value(spec).map_err(|e| ConfigSourceError::WriteFailed {
            path: self.path_string(),
            reason: e.to_string(),
        })?;
        config.mcp_servers.insert(descriptor.name.clone(), value);
        self.write_config(&config).await?;
        info!(name = %descriptor.name, "added server to assistant config");
        Ok(())
    }

    async fn remove_server(&self, name: &str) -> Result<(), ConfigSourceError> {
        let mut config = self.read_config().await?;
        if config.mcp_servers.shift_remove(name).is_none() {
            return Err(ConfigSourceError::NoSuchServer(name.to_string()));
        }
        self.write_config(&config).await?;
        info!(name = %name, "removed server from assistant config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
  "globalShortcut": "CommandOrControl+Space",
  "mcpServers": {
    "filesystem": {
      "command": "node",
      "args": ["/opt/mcp/fs.js"],
      "env": { "MCP_ROOT": "/srv" }
    },
    "weather": {
      "command": "uvx",
      "args": ["weather-mcp-server"]
    }
  }
}"#;

    async fn adapter_with(content: &str) -> (tempfile::TempDir, AssistantConfigFile) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claude_desktop_config.json");
        tokio::fs::write(&path, content).await.unwrap();
        (dir, AssistantConfigFile::new(path))
    }

    #[tokio::test]
    async fn load_reads_servers_in_file_order() {
        let (_dir, adapter) = adapter_with(SAMPLE).await;
        let descriptors = adapter.load().await.unwrap();

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "filesystem");
        assert_eq!(descriptors[0].command, "node");
        assert_eq!(
            descriptors[0]
                .env
                .as_ref()
                .and_then(|e| e.get("MCP_ROOT"))
                .unwrap(),
            "/srv"
        );
        assert_eq!(descriptors[1].name, "weather");
        assert_eq!(descriptors[1].source, ServerSource::Assistant);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let adapter = AssistantConfigFile::new(dir.path().join("nope.json"));
        assert!(adapter.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_unreadable() {
        let (_dir, adapter) = adapter_with("{ not json").await;
        let err = adapter.load().await.unwrap_err();
        assert!(matches!(err, ConfigSourceError::Unreadable { .. }));
    }

    #[tokio::test]
    async fn malformed_entry_is_skipped() {
        let (_dir, adapter) = adapter_with(
            r#"{ "mcpServers": { "bad": { "args": [] }, "good": { "command": "node" } } }"#,
        )
        .await;
        let descriptors = adapter.load().await.unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "good");
    }

    #[tokio::test]
    async fn remove_preserves_unrelated_keys() {
        let (_dir, adapter) = adapter_with(SAMPLE).await;

        adapter.remove_server("filesystem").await.unwrap();

        let descriptors = adapter.load().await.unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "weather");

        let raw = tokio::fs::read_to_string(adapter.config_path()).await.unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["globalShortcut"], "CommandOrControl+Space");
    }

    #[tokio::test]
    async fn remove_unknown_name_reports_no_such_server() {
        let (_dir, adapter) = adapter_with(SAMPLE).await;
        let err = adapter.remove_server("ghost").await.unwrap_err();
        assert!(matches!(err, ConfigSourceError::NoSuchServer(_)));
    }

    #[tokio::test]
    async fn add_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let adapter = AssistantConfigFile::new(dir.path().join("config.json"));

        let descriptor = ServerDescriptor::new(
            "search",
            "python",
            ServerSource::Assistant,
            adapter.config_path(),
        )
        .with_args(vec!["-m".to_string(), "search_mcp".to_string()]);
        adapter.add_server(&descriptor).await.unwrap();

        let descriptors = adapter.load().await.unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].command, "python");
        assert_eq!(descriptors[0].args, vec!["-m", "search_mcp"]);
    }

    #[tokio::test]
    async fn rewrite_leaves_no_temp_file_behind() {
        let (dir, adapter) = adapter_with(SAMPLE).await;
        adapter.remove_server("weather").await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
