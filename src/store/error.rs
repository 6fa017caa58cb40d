use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the glossary file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Glossary path cannot be used (no file name, or parent cannot be created).
    #[error("Invalid glossary path: {0}")]
    InvalidPath(PathBuf),
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Failed to create or read a backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
