//! Catalog error types.

use thiserror::Error;

/// Message carried by every rejected remote-only operation
pub const OFFLINE_UNSUPPORTED_MESSAGE: &str = "Not available in offline mode";

/// Catalog error types
///
/// Missing directories and malformed playlist headers are not errors: those
/// degrade to empty results.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A network-only operation was requested while offline.
    #[error("Not available in offline mode")]
    OfflineUnsupported { operation: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings store error: {0}")]
    Settings(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn offline_unsupported(operation: &'static str) -> Self {
        CatalogError::OfflineUnsupported { operation }
    }

    /// True for the offline mode indicator, which callers handle rather than report
    pub fn is_offline_unsupported(&self) -> bool {
        matches!(self, CatalogError::OfflineUnsupported { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
