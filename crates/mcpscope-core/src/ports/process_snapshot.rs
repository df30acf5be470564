//! Process snapshot port.
//!
//! Produces a point-in-time list of OS processes with full command and
//! argument vectors. No name filtering happens here: deciding whether a
//! process is MCP-relevant requires comparing whole argv vectors (servers
//! are frequently launched through `python`/`node`/`uv` with the real
//! identity in the arguments), and that is the matcher's job.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ProcessRecord;

/// Errors from reading the OS process table.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The process table could not be read (permissions, platform API).
    #[error("process enumeration failed: {0}")]
    Enumeration(String),
}

/// Port for taking point-in-time process-table snapshots.
#[async_trait]
pub trait ProcessSnapshotPort: Send + Sync {
    /// Take a fresh snapshot of all visible OS processes.
    ///
    /// Records are recreated on every call; pids are only unique within
    /// one snapshot.
    async fn snapshot(&self) -> Result<Vec<ProcessRecord>, SnapshotError>;
}
