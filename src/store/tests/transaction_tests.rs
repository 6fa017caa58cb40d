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

//! Transaction tests
//!
//! Tests for atomic glossary writes and the backups they leave behind.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::core::TermCollection;
use crate::store::{StoreError, StoreTransaction, TermStore};

/// Helper: Creates a temporary glossary for testing.
fn create_test_glossary(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("glossary.txt");
    fs::write(&glossary_path, content).unwrap();
    (temp_dir, glossary_path)
}

#[test]
fn test_begin_creates_backup() {
    let (_temp_dir, glossary_path) = create_test_glossary("term::definition\n");
    let store = TermStore::new(glossary_path, 5).unwrap();

    let _tx = StoreTransaction::begin(&store).unwrap();

    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1, "Backup file should exist");
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "term::definition\n");
}

#[test]
fn test_begin_without_backups() {
    let (_temp_dir, glossary_path) = create_test_glossary("term::definition\n");
    let store = TermStore::new(glossary_path, 0).unwrap();

    let _tx = StoreTransaction::begin(&store).unwrap();
    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn test_commit_writes_serialised_terms() {
    let (_temp_dir, glossary_path) = create_test_glossary("old::entry\n");
    let store = TermStore::new(glossary_path.clone(), 5).unwrap();

    let mut terms = TermCollection::new();
    terms.insert("b", "second");
    terms.insert("a", "first");

    let tx = StoreTransaction::begin(&store).unwrap();
    tx.commit(&terms).unwrap();

    assert_eq!(fs::read_to_string(&glossary_path).unwrap(), "a::first\nb::second\n");
}

#[test]
fn test_commit_leaves_no_temp_files() {
    let (temp_dir, glossary_path) = create_test_glossary("old::entry\n");
    let store = TermStore::new(glossary_path, 0).unwrap();

    StoreTransaction::begin(&store)
        .unwrap()
        .commit(&TermCollection::new())
        .unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1, "Only the glossary should remain: {:?}", entries);
}

#[test]
fn test_committed_change_can_be_undone_from_snapshot() {
    let (_temp_dir, glossary_path) = create_test_glossary("original::content\n");
    let store = TermStore::new(glossary_path.clone(), 5).unwrap();

    let mut terms = TermCollection::new();
    terms.insert("replaced", "content");
    StoreTransaction::begin(&store).unwrap().commit(&terms).unwrap();
    assert_eq!(fs::read_to_string(&glossary_path).unwrap(), "replaced::content\n");

    let snapshot = store.list_backups().unwrap().remove(0);
    store.restore_backup(&snapshot).unwrap();

    assert_eq!(fs::read_to_string(&glossary_path).unwrap(), "original::content\n");
}

#[test]
fn test_failed_commit_leaves_file_untouched() {
    let (temp_dir, glossary_path) = create_test_glossary("keep::me\n");
    let store = TermStore::new(glossary_path.clone(), 0).unwrap();

    let tx = StoreTransaction::begin(&store).unwrap();

    // Read-only directory: the temp file for the atomic write cannot be created
    let mut perms = fs::metadata(temp_dir.path()).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(temp_dir.path(), perms.clone()).unwrap();

    let result = tx.commit(&TermCollection::new());

    perms.set_readonly(false);
    fs::set_permissions(temp_dir.path(), perms).unwrap();

    // Permission bits do not stop root, so only a failed commit is checked
    if let Err(e) = result {
        assert!(matches!(e, StoreError::WriteFailed(_)), "got: {:?}", e);
        assert_eq!(fs::read_to_string(&glossary_path).unwrap(), "keep::me\n");
    }
}
