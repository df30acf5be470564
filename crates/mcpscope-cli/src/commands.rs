//! Subcommand definitions.

use clap::Subcommand;

/// Available mcpscope subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the reconciled server inventory (default)
    List,

    /// Start a configured server as a detached process
    Start {
        /// Server name as declared by its source
        name: String,
    },

    /// Gracefully stop a running server
    Stop {
        /// Server name as declared by its source
        name: String,
    },

    /// Forcefully terminate a process by pid (for discovered servers)
    Kill {
        /// Target process id
        pid: u32,
    },

    /// Remove a server from its configuration source, stopping it first
    Uninstall {
        /// Server name as declared by its source
        name: String,
    },

    /// Show process details for a single pid
    Info {
        /// Target process id
        pid: u32,
    },

    /// Reprint the inventory on a polling interval
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}
