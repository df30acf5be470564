//! Domain types for the server inventory.

mod inventory;

pub use inventory::{
    ProcessRecord, RunningServerEntry, ServerDescriptor, ServerSource, SourceWarning,
    SystemInventory, WarningSource,
};
