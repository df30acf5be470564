//! Configuration source and store ports.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ServerDescriptor, ServerSource};

/// Errors from reading or rewriting a configuration authority.
#[derive(Debug, Error)]
pub enum ConfigSourceError {
    /// The file is missing where required, unparsable, or unreadable.
    ///
    /// Recoverable: the reconciler treats a failed source as an empty
    /// list and attaches a warning instead of aborting.
    #[error("config unreadable at {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The file could not be rewritten (permissions, lock, disk).
    #[error("config write failed at {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    /// The named server does not exist in this source.
    #[error("server '{0}' not present in config")]
    NoSuchServer(String),
}

/// Read-only port over one configuration authority.
///
/// Each load re-reads the backing file and produces fresh descriptors;
/// nothing is cached between reconciliation cycles.
#[async_trait]
pub trait ConfigSourcePort: Send + Sync {
    /// Which authority this adapter reads.
    fn source(&self) -> ServerSource;

    /// Path of the backing file, for warnings and entry provenance.
    fn config_path(&self) -> String;

    /// Load all declared servers, in file order.
    async fn load(&self) -> Result<Vec<ServerDescriptor>, ConfigSourceError>;
}

/// Write path of a mutable configuration authority.
///
/// Rewrites must be atomic (readers never observe a half-written file)
/// and must preserve unrelated content of the file.
#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    /// Add a server entry under its name.
    async fn add_server(&self, descriptor: &ServerDescriptor) -> Result<(), ConfigSourceError>;

    /// Remove the named server entry.
    ///
    /// Returns [`ConfigSourceError::NoSuchServer`] when the name is not
    /// present, so callers can distinguish "already gone" from "failed".
    async fn remove_server(&self, name: &str) -> Result<(), ConfigSourceError>;
}
