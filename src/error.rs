//! Error types for FlatStore
//!
//! Hard failures (I/O, corruption, a dropped store) are errors. Business
//! outcomes such as a duplicate id or a missing record are ordinary return
//! values and never show up here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for FlatStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file {path} unavailable: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Store is not initialized (capacity is 0)")]
    NotInitialized,

    #[error("Store file corrupted: {0}")]
    Corrupt(String),

    #[error("Capacity overflow: cannot grow beyond {max} slots")]
    CapacityOverflow { max: u32 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Maintenance Errors
    // -------------------------------------------------------------------------
    #[error("Maintenance failure: {0}")]
    MaintenanceFailure(String),
}

impl StoreError {
    /// Wrap an open/create failure with the path that could not be opened
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::StoreUnavailable {
            path: path.into(),
            source,
        }
    }
}
