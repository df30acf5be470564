//! Descriptor-to-process identity matching.
//!
//! For each descriptor, find the zero-or-one live process that "is" that
//! server; classify every unclaimed process that still looks like an MCP
//! server as a discovered entry.

use crate::domain::{ProcessRecord, RunningServerEntry, ServerDescriptor, ServerSource};

/// Tunable knobs for identity matching.
///
/// `interpreters` lists executables whose real identity lives in the
/// argument vector; `indicators` is the allow-list of substrings that
/// mark an unclaimed process as an MCP server candidate.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Known interpreter/launcher binaries (compared by basename).
    pub interpreters: Vec<String>,
    /// Lowercase substrings that flag an MCP-looking command line.
    pub indicators: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            interpreters: [
                "python", "python3", "node", "uv", "uvx", "npx", "bun", "deno",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            indicators: [
                "mcp-server",
                "mcp_server",
                "--mcp",
                "model-context-protocol",
                "mcp-",
                "_mcp_",
                "_mcp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl MatcherConfig {
    fn is_interpreter(&self, command: &str) -> bool {
        let base = basename(command);
        self.interpreters.iter().any(|i| i == base)
    }

    fn matches_indicator(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        self.indicators.iter().any(|i| lower.contains(i.as_str()))
    }
}

/// Outcome of matching one snapshot against one descriptor list.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Pid assigned to each descriptor, aligned with the input order.
    /// 0 means configured-but-not-running.
    pub assigned: Vec<u32>,
    /// Unclaimed processes that resemble MCP servers, snapshot order.
    pub discovered: Vec<RunningServerEntry>,
}

/// Match descriptors against a process snapshot.
///
/// Descriptors are evaluated in input order and each match removes the
/// claimed process from the candidate pool, so a pid is claimed by at
/// most one descriptor and ties resolve to the earliest-declared
/// descriptor. The whole function is deterministic in its inputs.
#[must_use]
pub fn match_inventory(
    config: &MatcherConfig,
    descriptors: &[ServerDescriptor],
    snapshot: &[ProcessRecord],
) -> MatchResult {
    let mut claimed = vec![false; snapshot.len()];
    let mut assigned = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let found = find_match(config, descriptor, snapshot, &claimed);
        match found {
            Some(index) => {
                claimed[index] = true;
                assigned.push(snapshot[index].pid);
            }
            None => assigned.push(0),
        }
    }

    let mut discovered = Vec::new();
    let mut used_names: Vec<String> = Vec::new();
    for (index, process) in snapshot.iter().enumerate() {
        if claimed[index] {
            continue;
        }
        if let Some(mut entry) = classify_discovered(config, process) {
            if used_names.iter().any(|n| n == &entry.name) {
                // Same script running twice: keep both rows distinct.
                entry.name = format!("{}#{}", entry.name, entry.pid);
            }
            used_names.push(entry.name.clone());
            discovered.push(entry);
        }
    }

    MatchResult {
        assigned,
        discovered,
    }
}

/// Exact rule first, interpreter rule second; within a rule the first
/// unclaimed process in snapshot order wins.
fn find_match(
    config: &MatcherConfig,
    descriptor: &ServerDescriptor,
    snapshot: &[ProcessRecord],
    claimed: &[bool],
) -> Option<usize> {
    for (index, process) in snapshot.iter().enumerate() {
        if !claimed[index] && exact_match(descriptor, process) {
            return Some(index);
        }
    }
    for (index, process) in snapshot.iter().enumerate() {
        if !claimed[index] && interpreter_match(config, descriptor, process) {
            return Some(index);
        }
    }
    None
}

fn exact_match(descriptor: &ServerDescriptor, process: &ProcessRecord) -> bool {
    process.command == descriptor.command && process.args == descriptor.args
}

/// The process is a known interpreter and the descriptor's command plus
/// args appear as a contiguous subsequence of the process argv.
fn interpreter_match(
    config: &MatcherConfig,
    descriptor: &ServerDescriptor,
    process: &ProcessRecord,
) -> bool {
    if !config.is_interpreter(&process.command) {
        return false;
    }
    let mut needle = Vec::with_capacity(descriptor.args.len() + 1);
    needle.push(descriptor.command.clone());
    needle.extend(descriptor.args.iter().cloned());
    contains_contiguous(&process.args, &needle)
}

fn contains_contiguous(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Decide whether an unclaimed process is worth surfacing, and under
/// which identity.
///
/// A confident name derived from an mcp-looking argv token yields a
/// `System` entry; a process that only tripped the heuristic (flag or
/// path fragment) is surfaced as `Unknown` under its command basename.
fn classify_discovered(config: &MatcherConfig, process: &ProcessRecord) -> Option<RunningServerEntry> {
    let command_hit = config.matches_indicator(basename(&process.command));
    let arg_hit = process
        .args
        .iter()
        .find(|arg| !arg.starts_with('-') && config.matches_indicator(arg));
    let flag_hit = process
        .args
        .iter()
        .any(|arg| arg.starts_with('-') && config.matches_indicator(arg));

    let (name, source) = if let Some(token) = arg_hit {
        (basename(token).to_string(), ServerSource::System)
    } else if command_hit {
        (basename(&process.command).to_string(), ServerSource::System)
    } else if flag_hit {
        (basename(&process.command).to_string(), ServerSource::Unknown)
    } else {
        return None;
    };

    Some(RunningServerEntry {
        name,
        pid: process.pid,
        command: process.command.clone(),
        args: process.args.clone(),
        source,
        config_path: None,
    })
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
