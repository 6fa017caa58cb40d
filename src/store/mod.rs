//! Glossary file storage with atomic writes and backup support.
//!
//! `TermStore` owns the on-disk glossary: one `term::definition` entry per
//! line. Key features:
//!
//! - **Never-fail loads**: `load()` logs problems and returns a (possibly
//!   empty) collection; `try_load()` exposes the error for callers that care
//! - **Atomic writes**: Uses temp-file-then-rename so a crash never leaves a
//!   half-written glossary
//! - **Serialised read-modify-write**: `modify()` holds a process-wide lock
//!   around load, mutate and save, so concurrent requests cannot lose updates
//! - **Automatic backups**: Every write snapshots the previous file into
//!   `backups/` next to the glossary, keeping the newest N
//!
//! # Example
//!
//! ```no_run
//! use termbook::core::add_term;
//! use termbook::store::TermStore;
//!
//! let store = TermStore::new("/tmp/glossary.txt".into(), 10)?;
//!
//! match store.modify(|terms| add_term(terms, "loop", "repeats a block"))? {
//!     Ok(outcome) => println!("{}", outcome),
//!     Err(rejected) => println!("{}", rejected),
//! }
//! # Ok::<(), termbook::store::StoreError>(())
//! ```

mod error;
pub mod transaction;

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::core::parser::{parse_glossary, ParsedGlossary};
use crate::core::types::{MalformedLine, TermCollection};

pub use error::StoreError;
pub use transaction::StoreTransaction;

/// Backup file suffix format, e.g. `glossary.txt.2025-10-10_221500_042`
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S_%3f";

/// Number of backups kept when nothing else is configured.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Outcome of a successful load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Parsed entries
    pub terms: TermCollection,
    /// Lines that were skipped
    pub malformed: Vec<MalformedLine>,
    /// True if the file did not exist and was created empty
    pub created: bool,
}

/// Manages the glossary file with safe atomic operations.
///
/// The store is shared by every request handler. It never caches the
/// collection: each load reads the file, so the file stays the single
/// source of truth between requests.
#[derive(Debug)]
pub struct TermStore {
    /// Path to the glossary file.
    glossary_path: PathBuf,
    backup_dir: PathBuf,
    /// Backups kept after each write; 0 disables backups.
    max_backups: usize,
    write_lock: Mutex<()>,
}

impl TermStore {
    /// Creates a new TermStore for the given glossary file.
    ///
    /// The parent directory is created if needed. When `max_backups` is
    /// non-zero the backup directory (`<parent>/backups`) is created too.
    /// The glossary file itself is created lazily by the first load.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if the path has no file name or its
    /// parent directory cannot be created.
    /// Returns `StoreError::BackupDirNotWritable` if the backup directory
    /// cannot be created or is read-only.
    pub fn new(glossary_path: PathBuf, max_backups: usize) -> Result<Self, StoreError> {
        if glossary_path.file_name().is_none() {
            return Err(StoreError::InvalidPath(glossary_path));
        }

        // Warn if the glossary is a symlink (but allow it)
        if glossary_path.read_link().is_ok() {
            warn!(path = %glossary_path.display(), "glossary file is a symlink");
        }

        // "glossary.txt" has an empty parent; treat it as the working directory
        let parent = match glossary_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !parent.exists() {
            fs::create_dir_all(&parent).map_err(|_| StoreError::InvalidPath(glossary_path.clone()))?;
        }

        // e.g., ./data/glossary.txt → ./data/backups/
        let backup_dir = parent.join("backups");

        if max_backups > 0 {
            if !backup_dir.exists() {
                fs::create_dir_all(&backup_dir)
                    .map_err(|_| StoreError::BackupDirNotWritable(backup_dir.clone()))?;
            }

            if backup_dir.metadata()?.permissions().readonly() {
                return Err(StoreError::BackupDirNotWritable(backup_dir));
            }
        }

        Ok(Self {
            glossary_path,
            backup_dir,
            max_backups,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the glossary file.
    pub fn path(&self) -> &Path {
        &self.glossary_path
    }

    /// Directory holding timestamped backups.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Returns true if writes snapshot the previous file.
    pub fn backups_enabled(&self) -> bool {
        self.max_backups > 0
    }

    /// Number of backups kept after each write.
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// Reads and parses the glossary, reporting I/O failures.
    ///
    /// A missing file is created empty and yields an empty collection; this
    /// is not an error. Malformed lines are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be created or read.
    pub fn try_load(&self) -> Result<LoadReport, StoreError> {
        let mut created = false;

        if !self.glossary_path.exists() {
            fs::write(&self.glossary_path, "")?;
            info!(path = %self.glossary_path.display(), "glossary file not found, created empty file");
            created = true;
        }

        let content = fs::read_to_string(&self.glossary_path)?;
        let ParsedGlossary { terms, malformed } = parse_glossary(&content);

        for line in &malformed {
            warn!(path = %self.glossary_path.display(), "skipping malformed glossary {}", line);
        }
        debug!(entries = terms.len(), "glossary loaded");

        Ok(LoadReport {
            terms,
            malformed,
            created,
        })
    }

    /// Reads the glossary, never failing.
    ///
    /// Any I/O error is logged and an empty collection is returned, so
    /// callers always receive a collection.
    pub fn load(&self) -> TermCollection {
        match self.try_load() {
            Ok(report) => report.terms,
            Err(e) => {
                error!(path = %self.glossary_path.display(), "failed to load glossary, using empty collection: {}", e);
                TermCollection::new()
            }
        }
    }

    /// Overwrites the glossary with `terms`.
    ///
    /// The write is atomic and preceded by a backup when backups are
    /// enabled. Callers that only need legacy behaviour may ignore the
    /// result; the failure has already been logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup or the atomic write fails. The
    /// previous file content is left untouched in that case.
    pub fn save(&self, terms: &TermCollection) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.write_locked(terms)
    }

    /// Runs one load → mutate → save cycle under the store lock.
    ///
    /// The closure's own error (typically a `ValidationError`) is returned
    /// in the inner `Result` and nothing is written. Persistence failures
    /// are returned in the outer `Result`; a failed load aborts the cycle
    /// instead of overwriting the file with an empty collection.
    pub fn modify<T, E, F>(&self, f: F) -> Result<Result<T, E>, StoreError>
    where
        F: FnOnce(&mut TermCollection) -> Result<T, E>,
    {
        let _guard = self.lock();

        let mut terms = self.try_load()?.terms;
        match f(&mut terms) {
            Ok(value) => {
                self.write_locked(&terms)?;
                Ok(Ok(value))
            }
            Err(rejected) => Ok(Err(rejected)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // A panic inside another cycle leaves nothing half-written on disk
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_locked(&self, terms: &TermCollection) -> Result<(), StoreError> {
        let result = StoreTransaction::begin(self).and_then(|tx| tx.commit(terms));

        match &result {
            Ok(()) => info!(path = %self.glossary_path.display(), entries = terms.len(), "glossary saved"),
            Err(e) => error!(path = %self.glossary_path.display(), "failed to save glossary: {}", e),
        }

        result
    }

    /// Copies the current glossary into the backup directory.
    ///
    /// Returns `Ok(None)` when backups are disabled or there is nothing to
    /// back up (missing or empty file).
    pub(crate) fn create_timestamped_backup(&self) -> Result<Option<PathBuf>, StoreError> {
        if !self.backups_enabled() || !self.glossary_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.glossary_path)?;
        if content.is_empty() {
            return Ok(None);
        }

        let original_name = self.file_name()?;

        // Millisecond resolution; wait out a collision rather than overwrite
        let mut backup_path;
        loop {
            let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT);
            backup_path = self.backup_dir.join(format!("{}.{}", original_name, timestamp));
            if !backup_path.exists() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }

        fs::write(&backup_path, &content)
            .map_err(|e| StoreError::BackupFailed(format!("{}: {}", backup_path.display(), e)))?;

        debug!(backup = %backup_path.display(), "backup created");
        Ok(Some(backup_path))
    }

    /// Lists backups of this glossary, newest first.
    ///
    /// Files in the backup directory that do not match
    /// `<glossary name>.<timestamp>` are ignored.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}.", self.file_name()?);
        let mut backups: Vec<(NaiveDateTime, PathBuf)> = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(timestamp) = name.strip_prefix(&prefix) else {
                continue;
            };

            if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, BACKUP_TIMESTAMP_FORMAT) {
                backups.push((parsed, path));
            }
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Deletes all but the `keep` most recent backups.
    ///
    /// Returns the number of backups deleted.
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<usize, StoreError> {
        let backups = self.list_backups()?;
        let mut deleted = 0;

        for old in backups.iter().skip(keep) {
            fs::remove_file(old)?;
            deleted += 1;
        }

        if deleted > 0 {
            debug!(deleted, keep, "old backups removed");
        }
        Ok(deleted)
    }

    /// Restores the glossary from a backup file.
    ///
    /// The current glossary is backed up first, so a restore can itself be
    /// undone. The backup content is written byte for byte.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BackupFailed` if `backup_path` does not exist or
    /// is not a file. The glossary is left untouched in that case.
    pub fn restore_backup(&self, backup_path: &Path) -> Result<(), StoreError> {
        if !backup_path.exists() {
            return Err(StoreError::BackupFailed(format!(
                "Backup {} does not exist",
                backup_path.display()
            )));
        }
        if !backup_path.is_file() {
            return Err(StoreError::BackupFailed(format!(
                "Backup {} is not a file",
                backup_path.display()
            )));
        }

        let content = fs::read_to_string(backup_path)?;

        let _guard = self.lock();
        StoreTransaction::begin(self)?.commit_content(&content)?;

        info!(backup = %backup_path.display(), "glossary restored from backup");
        Ok(())
    }

    fn file_name(&self) -> Result<&str, StoreError> {
        self.glossary_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidPath(self.glossary_path.clone()))
    }
}

#[cfg(test)]
mod tests;
