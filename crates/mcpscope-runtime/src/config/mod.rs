//! Configuration source adapters.
//!
//! Two authorities declare MCP servers: the desktop assistant's JSON
//! config and the editor's JSONC settings. Both adapters re-read their
//! file on every load; only the assistant adapter carries a write path.

mod assistant;
mod editor;
mod jsonc;

pub use assistant::AssistantConfigFile;
pub use editor::EditorSettingsFile;
