//! The reconciliation pipeline: identity matching plus inventory assembly.
//!
//! Everything in this module is pure and synchronous. The process
//! snapshot and both descriptor lists arrive as inputs rather than being
//! fetched here, which keeps the whole pipeline testable without I/O.

mod inventory;
mod matcher;

pub use inventory::reconcile;
pub use matcher::{MatchResult, MatcherConfig, match_inventory};
