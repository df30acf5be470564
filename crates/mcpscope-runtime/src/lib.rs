//! OS-level adapters for mcpscope.
//!
//! Implements the core's ports against real infrastructure: the process
//! table via `sysinfo`, the two configuration files on disk, and
//! process spawn/signal plumbing.

pub mod config;
pub mod control;
pub mod paths;
pub mod snapshot;

pub use config::{AssistantConfigFile, EditorSettingsFile};
pub use control::DefaultProcessControl;
pub use paths::{PathError, assistant_config_path, editor_settings_path};
pub use snapshot::SysinfoSnapshot;

// Silence unused dev-dependency warnings until we add runtime-level async tests
#[cfg(test)]
use tokio_test as _;
