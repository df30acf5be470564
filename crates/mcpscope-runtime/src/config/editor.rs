//! Editor settings adapter (read-only).
//!
//! The editor's `settings.json` is JSONC. Servers can be declared in
//! two places: the top-level `mcp.servers` object and the legacy
//! `github.copilot.advanced.mcp` block; both are read, later duplicates
//! collapse during reconciliation.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use mcpscope_core::domain::{ServerDescriptor, ServerSource};
use mcpscope_core::ports::{ConfigSourceError, ConfigSourcePort};

use super::jsonc;

#[derive(Debug, Clone, Deserialize)]
struct LaunchSpec {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: Option<BTreeMap<String, String>>,
}

/// Read-only adapter over the editor's settings file.
pub struct EditorSettingsFile {
    path: PathBuf,
}

impl EditorSettingsFile {
    /// Create an adapter for the given settings file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }

    fn descriptors_from(&self, servers: &Value, out: &mut Vec<ServerDescriptor>) {
        let Some(object) = servers.as_object() else {
            return;
        };
        for (name, value) in object {
            match serde_json::from_value::<LaunchSpec>(value.clone()) {
                Ok(spec) => {
                    let mut descriptor = ServerDescriptor::new(
                        name,
                        spec.command,
                        ServerSource::Editor,
                        self.path_string(),
                    )
                    .with_args(spec.args);
                    descriptor.env = spec.env;
                    out.push(descriptor);
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "skipping malformed editor server entry");
                }
            }
        }
    }
}

#[async_trait]
impl ConfigSourcePort for EditorSettingsFile {
    fn source(&self) -> ServerSource {
        ServerSource::Editor
    }

    fn config_path(&self) -> String {
        self.path_string()
    }

    async fn load(&self) -> Result<Vec<ServerDescriptor>, ConfigSourceError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // No editor installed: an empty source, not an error.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "editor settings missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ConfigSourceError::Unreadable {
                    path: self.path_string(),
                    reason: e.to_string(),
                });
            }
        };

        let settings: Value =
            serde_json::from_str(&jsonc::strip(&raw)).map_err(|e| ConfigSourceError::Unreadable {
                path: self.path_string(),
                reason: e.to_string(),
            })?;

        let mut descriptors = Vec::new();
        self.descriptors_from(&settings["mcp"]["servers"], &mut descriptors);
        self.descriptors_from(
            &settings["github.copilot.advanced"]["mcp"],
            &mut descriptors,
        );
        Ok(descriptors)
    }
}
