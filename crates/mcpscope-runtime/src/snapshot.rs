//! Process-table snapshots via `sysinfo`.

use async_trait::async_trait;
use sysinfo::System;
use tracing::debug;

use mcpscope_core::domain::ProcessRecord;
use mcpscope_core::ports::{ProcessSnapshotPort, SnapshotError};

/// Snapshot provider backed by the OS process table.
///
/// Enumeration walks every visible process and keeps the full argv.
/// MCP servers usually run behind an interpreter, so the identity lives
/// in the arguments; filtering is the matcher's job, not ours.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoSnapshot;

impl SysinfoSnapshot {
    /// Create a snapshot provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Look up a single pid in a fresh snapshot.
    ///
    /// Used for inspecting discovered processes; returns `None` when the
    /// pid is gone by the time the table is read.
    pub async fn process_info(&self, pid: u32) -> Result<Option<ProcessRecord>, SnapshotError> {
        let records = self.snapshot().await?;
        Ok(records.into_iter().find(|record| record.pid == pid))
    }
}

#[async_trait]
impl ProcessSnapshotPort for SysinfoSnapshot {
    async fn snapshot(&self) -> Result<Vec<ProcessRecord>, SnapshotError> {
        // Walking the whole table is blocking work; keep it off the
        // async workers.
        let records = tokio::task::spawn_blocking(collect_records)
            .await
            .map_err(|e| SnapshotError::Enumeration(e.to_string()))?;
        debug!(count = records.len(), "process snapshot taken");
        Ok(records)
    }
}

fn collect_records() -> Vec<ProcessRecord> {
    let sys = System::new_all();
    let mut records: Vec<ProcessRecord> = sys
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let cmd = process.cmd();
            // Kernel threads and zombies report an empty argv.
            let command = cmd.first()?.to_string_lossy().into_owned();
            let args = cmd[1..]
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            Some(ProcessRecord::new(pid.as_u32(), command, args))
        })
        .collect();

    // The process map iterates in arbitrary order; pin snapshot order
    // so downstream ordering guarantees hold.
    records.sort_by_key(|record| record.pid);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_includes_this_process() {
        let provider = SysinfoSnapshot::new();
        let records = provider.snapshot().await.unwrap();
        let own = std::process::id();
        assert!(records.iter().any(|record| record.pid == own));
    }

    #[tokio::test]
    async fn snapshot_is_sorted_by_pid() {
        let provider = SysinfoSnapshot::new();
        let records = provider.snapshot().await.unwrap();
        assert!(records.windows(2).all(|pair| pair[0].pid < pair[1].pid));
    }

    #[tokio::test]
    async fn process_info_finds_this_process() {
        let provider = SysinfoSnapshot::new();
        let own = std::process::id();
        let record = provider.process_info(own).await.unwrap();
        assert_eq!(record.map(|r| r.pid), Some(own));
    }

    #[tokio::test]
    async fn process_info_misses_impossible_pid() {
        let provider = SysinfoSnapshot::new();
        let record = provider.process_info(u32::MAX - 1).await.unwrap();
        assert!(record.is_none());
    }
}
