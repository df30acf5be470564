//! Inventory service: gather inputs, degrade failures, reconcile.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    ProcessRecord, ServerDescriptor, SourceWarning, SystemInventory, WarningSource,
};
use crate::ports::{ConfigSourcePort, ProcessSnapshotPort};
use crate::reconcile::{MatcherConfig, reconcile};

/// Collects the three reconciliation inputs and produces the inventory.
///
/// The snapshot and both config reads are independent I/O, so they are
/// fetched concurrently; all three are joined before matching starts.
/// A failed input degrades to an empty list plus a warning on the
/// resulting inventory: partial results over total failure.
pub struct InventoryService {
    processes: Arc<dyn ProcessSnapshotPort>,
    assistant: Arc<dyn ConfigSourcePort>,
    editor: Arc<dyn ConfigSourcePort>,
    matcher: MatcherConfig,
}

impl InventoryService {
    /// Create an inventory service over the three input ports.
    pub fn new(
        processes: Arc<dyn ProcessSnapshotPort>,
        assistant: Arc<dyn ConfigSourcePort>,
        editor: Arc<dyn ConfigSourcePort>,
        matcher: MatcherConfig,
    ) -> Self {
        Self {
            processes,
            assistant,
            editor,
            matcher,
        }
    }

    /// Run one full reconciliation cycle.
    pub async fn collect(&self) -> SystemInventory {
        let (snapshot, assistant, editor) = tokio::join!(
            self.processes.snapshot(),
            self.assistant.load(),
            self.editor.load(),
        );

        let mut warnings = Vec::new();

        let snapshot: Vec<ProcessRecord> = match snapshot {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "process snapshot failed, reconciling without it");
                warnings.push(SourceWarning::new(WarningSource::Processes, e.to_string()));
                Vec::new()
            }
        };
        let assistant = degrade(assistant, WarningSource::Assistant, &mut warnings);
        let editor = degrade(editor, WarningSource::Editor, &mut warnings);

        let mut inventory = reconcile(&self.matcher, &snapshot, &assistant, &editor);
        inventory.warnings = warnings;
        inventory
    }

    /// Load the raw descriptor lists (assistant first, then editor).
    ///
    /// Lifecycle operations need the full descriptors; the inventory
    /// entries drop the env mapping.
    pub async fn load_descriptors(&self) -> Vec<ServerDescriptor> {
        let (assistant, editor) = tokio::join!(self.assistant.load(), self.editor.load());
        let mut out = assistant.unwrap_or_default();
        out.extend(editor.unwrap_or_default());
        out
    }
}

fn degrade(
    loaded: Result<Vec<ServerDescriptor>, crate::ports::ConfigSourceError>,
    source: WarningSource,
    warnings: &mut Vec<SourceWarning>,
) -> Vec<ServerDescriptor> {
    match loaded {
        Ok(descriptors) => descriptors,
        Err(e) => {
            warn!(source = ?source, error = %e, "config source failed, using empty list");
            warnings.push(SourceWarning::new(source, e.to_string()));
            Vec::new()
        }
    }
}
