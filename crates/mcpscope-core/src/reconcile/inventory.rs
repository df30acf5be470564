//! Inventory assembly: merge descriptor lists and match results into
//! one deduplicated, deterministically ordered view.

use tracing::debug;

use super::matcher::{MatcherConfig, match_inventory};
use crate::domain::{
    ProcessRecord, RunningServerEntry, ServerDescriptor, ServerSource, SystemInventory,
};

/// Reconcile one process snapshot with both descriptor lists.
///
/// Pure function of its inputs: same snapshot and descriptor lists
/// always produce an identical inventory, content and order. Ordering is
/// assistant entries in declaration order, then editor entries, then
/// discovered processes in snapshot order. A `(source, name)` pair
/// appears at most once; later duplicates within a source are dropped.
#[must_use]
pub fn reconcile(
    config: &MatcherConfig,
    snapshot: &[ProcessRecord],
    assistant: &[ServerDescriptor],
    editor: &[ServerDescriptor],
) -> SystemInventory {
    let mut descriptors: Vec<ServerDescriptor> = Vec::with_capacity(assistant.len() + editor.len());
    descriptors.extend(dedup_by_name(assistant));
    descriptors.extend(dedup_by_name(editor));

    let result = match_inventory(config, &descriptors, snapshot);

    let mut running = Vec::new();
    let mut assistant_servers = Vec::new();
    let mut editor_servers = Vec::new();

    for (descriptor, pid) in descriptors.iter().zip(&result.assigned) {
        let entry = RunningServerEntry {
            name: descriptor.name.clone(),
            pid: *pid,
            command: descriptor.command.clone(),
            args: descriptor.args.clone(),
            source: descriptor.source,
            config_path: Some(descriptor.config_path.clone()),
        };
        if entry.is_running() {
            running.push(entry.clone());
        }
        match descriptor.source {
            ServerSource::Editor => editor_servers.push(entry),
            _ => assistant_servers.push(entry),
        }
    }

    running.extend(result.discovered);

    debug!(
        running = running.len(),
        assistant = assistant_servers.len(),
        editor = editor_servers.len(),
        "reconciled inventory"
    );

    SystemInventory {
        running,
        assistant_servers,
        editor_servers,
        warnings: Vec::new(),
    }
}

/// Keep the first declaration of each name within one source.
fn dedup_by_name(descriptors: &[ServerDescriptor]) -> Vec<ServerDescriptor> {
    let mut seen: Vec<&str> = Vec::with_capacity(descriptors.len());
    let mut out = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if seen.contains(&descriptor.name.as_str()) {
            debug!(name = %descriptor.name, "dropping duplicate descriptor");
            continue;
        }
        seen.push(&descriptor.name);
        out.push(descriptor.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, command: &str, args: &[&str], source: ServerSource) -> ServerDescriptor {
        ServerDescriptor::new(name, command, source, "/tmp/cfg.json")
            .with_args(args.iter().map(ToString::to_string).collect())
    }

    fn process(pid: u32, command: &str, args: &[&str]) -> ProcessRecord {
        ProcessRecord::new(pid, command, args.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn matched_entry_appears_in_both_lists_once() {
        let config = MatcherConfig::default();
        let assistant = vec![descriptor(
            "filesystem",
            "node",
            &["/opt/mcp/fs.js"],
            ServerSource::Assistant,
        )];
        let snapshot = vec![process(501, "node", &["/opt/mcp/fs.js"])];

        let inventory = reconcile(&config, &snapshot, &assistant, &[]);

        assert_eq!(inventory.assistant_servers.len(), 1);
        assert_eq!(inventory.assistant_servers[0].pid, 501);
        assert_eq!(inventory.running.len(), 1);
        assert_eq!(inventory.running[0].name, "filesystem");
    }

    #[test]
    fn unmatched_descriptor_gets_pid_zero() {
        let config = MatcherConfig::default();
        let assistant = vec![descriptor(
            "filesystem",
            "node",
            &["/opt/mcp/fs.js"],
            ServerSource::Assistant,
        )];

        let inventory = reconcile(&config, &[], &assistant, &[]);

        assert_eq!(inventory.assistant_servers[0].pid, 0);
        assert!(inventory.running.is_empty());
    }

    #[test]
    fn duplicate_names_within_source_collapse_to_first() {
        let config = MatcherConfig::default();
        let assistant = vec![
            descriptor("dup", "node", &["/a.js"], ServerSource::Assistant),
            descriptor("dup", "node", &["/b.js"], ServerSource::Assistant),
        ];

        let inventory = reconcile(&config, &[], &assistant, &[]);

        assert_eq!(inventory.assistant_servers.len(), 1);
        assert_eq!(inventory.assistant_servers[0].args, vec!["/a.js"]);
    }

    #[test]
    fn same_name_in_both_sources_is_kept_per_source() {
        let config = MatcherConfig::default();
        let assistant = vec![descriptor("fs", "node", &["/a.js"], ServerSource::Assistant)];
        let editor = vec![descriptor("fs", "node", &["/a.js"], ServerSource::Editor)];
        let snapshot = vec![process(42, "node", &["/a.js"])];

        let inventory = reconcile(&config, &snapshot, &assistant, &editor);

        // One live process: the assistant declaration claims it.
        assert_eq!(inventory.assistant_servers[0].pid, 42);
        assert_eq!(inventory.editor_servers[0].pid, 0);
        assert_eq!(inventory.running.len(), 1);
        assert_eq!(inventory.running[0].source, ServerSource::Assistant);
    }

    #[test]
    fn output_order_is_assistant_editor_discovered() {
        let config = MatcherConfig::default();
        let assistant = vec![descriptor("a", "node", &["/a.js"], ServerSource::Assistant)];
        let editor = vec![descriptor("e", "node", &["/e.js"], ServerSource::Editor)];
        let snapshot = vec![
            process(900, "python", &["-m", "stray_mcp_tool"]),
            process(10, "node", &["/e.js"]),
            process(11, "node", &["/a.js"]),
        ];

        let inventory = reconcile(&config, &snapshot, &assistant, &editor);

        let names: Vec<&str> = inventory.running.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "e", "stray_mcp_tool"]);
    }
}
