//! Error types for file store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the configured quota.
    #[error("Storage quota exceeded: {size} bytes requested, {quota} bytes allowed")]
    QuotaExceeded {
        /// Size of the rejected value in bytes.
        size: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// I/O operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },
}
