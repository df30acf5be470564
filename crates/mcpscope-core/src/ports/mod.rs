//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure:
//! the OS process table, the two configuration authorities, and process
//! spawn/signal plumbing. They contain no implementation details and use
//! only domain types.
//!
//! # Design Rules
//!
//! - No filesystem or process-API types in any signature
//! - Adapters are read-only; configuration mutation goes through the
//!   dedicated store port, never through a source adapter
//! - Intent-based methods, not implementation-leaking ones

pub mod config_source;
pub mod process_control;
pub mod process_snapshot;

pub use config_source::{ConfigSourceError, ConfigSourcePort, ConfigStorePort};
pub use process_control::{ControlError, ProcessControlPort, SignalMode};
pub use process_snapshot::{ProcessSnapshotPort, SnapshotError};
