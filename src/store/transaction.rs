// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Glossary write transactions with automatic backups
//!
//! Every write of the glossary file goes through a `StoreTransaction`.

use atomic_write_file::AtomicWriteFile;
use std::{io::Write, path::PathBuf};
use tracing::{debug, warn};

use crate::core::parser::serialize_glossary;
use crate::core::types::TermCollection;
use crate::store::{StoreError, TermStore};

/// Atomic glossary write with automatic backup.
///
/// # Lifecycle
///
/// 1. `begin()` - Snapshots the current file into the backup directory
/// 2. Caller prepares the new collection in memory
/// 3. `commit()` - Writes atomically and prunes old backups
///
/// The write is temp file + rename, so readers see either the old or the
/// new glossary, never a partial one. A failed commit leaves the file as it
/// was; the snapshot is what `TermStore::restore_backup` uses to undo a
/// commit that did succeed.
///
/// # Example
///
/// ```no_run
/// use termbook::core::TermCollection;
/// use termbook::store::{StoreTransaction, TermStore};
///
/// let store = TermStore::new("glossary.txt".into(), 10)?;
/// let tx = StoreTransaction::begin(&store)?;
///
/// let mut terms = TermCollection::new();
/// terms.insert("loop", "repeats a block");
/// tx.commit(&terms)?;
/// # Ok::<(), termbook::store::StoreError>(())
/// ```
pub struct StoreTransaction<'a> {
    store: &'a TermStore,
    backup_path: Option<PathBuf>,
}

impl<'a> StoreTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// No backup is taken when backups are disabled or the glossary is
    /// missing or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the current file cannot be read or the backup
    /// cannot be written. Nothing has been modified in that case.
    pub fn begin(store: &'a TermStore) -> Result<Self, StoreError> {
        let backup_path = store.create_timestamped_backup()?;

        Ok(Self { store, backup_path })
    }

    /// Commits the transaction by atomically writing `terms`.
    ///
    /// Consumes the transaction, preventing accidental double-commits. On
    /// success old backups beyond the configured retention are pruned;
    /// pruning failures are logged only.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the temporary file cannot be
    /// created, written or renamed. The original file remains unchanged.
    pub fn commit(self, terms: &TermCollection) -> Result<(), StoreError> {
        let content = serialize_glossary(terms);
        self.commit_content(&content)
    }

    /// Commits raw file content (used when restoring a backup verbatim).
    pub(crate) fn commit_content(self, new_content: &str) -> Result<(), StoreError> {
        write_atomically(self.store, new_content)?;

        if let Some(backup) = &self.backup_path {
            debug!(backup = %backup.display(), "previous glossary kept");
        }

        if self.store.backups_enabled() {
            if let Err(e) = self.store.cleanup_old_backups(self.store.max_backups()) {
                warn!("failed to prune old glossary backups: {}", e);
            }
        }

        Ok(())
    }
}

fn write_atomically(store: &TermStore, content: &str) -> Result<(), StoreError> {
    // Open file for atomic writing
    let mut file = AtomicWriteFile::options()
        .open(store.path())
        .map_err(|e| StoreError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| StoreError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| StoreError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
