//! Thin text rendering of the inventory.

use mcpscope_core::domain::{RunningServerEntry, ServerSource, SystemInventory};

fn source_label(source: ServerSource) -> &'static str {
    match source {
        ServerSource::Assistant => "assistant",
        ServerSource::Editor => "editor",
        ServerSource::System => "system",
        ServerSource::Unknown => "unknown",
    }
}

fn print_entry(entry: &RunningServerEntry) {
    let status = if entry.is_running() {
        format!("pid {}", entry.pid)
    } else {
        "configured".to_string()
    };
    let mut command_line = entry.command.clone();
    if !entry.args.is_empty() {
        command_line.push(' ');
        command_line.push_str(&entry.args.join(" "));
    }
    println!(
        "  {:<24} {:<12} {:<10} {}",
        entry.name,
        status,
        source_label(entry.source),
        command_line
    );
}

/// Print the full inventory grouped by section, with warnings first.
pub fn print_inventory(inventory: &SystemInventory) {
    for warning in &inventory.warnings {
        eprintln!("warning: {:?} source degraded: {}", warning.source, warning.message);
    }

    println!("Running ({}):", inventory.running.len());
    for entry in &inventory.running {
        print_entry(entry);
    }

    println!("\nAssistant servers ({}):", inventory.assistant_servers.len());
    for entry in &inventory.assistant_servers {
        print_entry(entry);
    }

    println!("\nEditor servers ({}):", inventory.editor_servers.len());
    for entry in &inventory.editor_servers {
        print_entry(entry);
    }

    let configured_only = inventory
        .assistant_servers
        .iter()
        .chain(inventory.editor_servers.iter())
        .filter(|entry| !entry.is_running())
        .count();
    println!(
        "\n{} running, {} configured but stopped",
        inventory.running.len(),
        configured_only
    );
}
