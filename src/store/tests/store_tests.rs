use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

use crate::core::{add_term, types::MalformedReason, TermCollection, ValidationError};
use crate::store::{StoreError, TermStore};

/// Helper: Creates a store over a temp glossary with known content.
fn create_test_store(content: &str, max_backups: usize) -> (TempDir, PathBuf, TermStore) {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("glossary.txt");
    fs::write(&glossary_path, content).unwrap();
    let store = TermStore::new(glossary_path.clone(), max_backups).unwrap();
    (temp_dir, glossary_path, store)
}

#[test]
fn test_new_creates_backup_dir() {
    let (temp_dir, _path, store) = create_test_store("", 5);

    let backup_dir = temp_dir.path().join("backups");
    assert!(backup_dir.is_dir(), "Backup directory should be created");
    assert_eq!(store.backup_dir(), backup_dir);
    assert!(store.backups_enabled());
}

#[test]
fn test_new_without_backups_skips_backup_dir() {
    let (temp_dir, _path, store) = create_test_store("", 0);

    assert!(!temp_dir.path().join("backups").exists());
    assert!(!store.backups_enabled());
}

#[test]
fn test_new_creates_missing_parent() {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("data").join("nested").join("glossary.txt");

    let store = TermStore::new(glossary_path.clone(), 0);
    assert!(store.is_ok(), "Should create missing parent directories");
    assert!(glossary_path.parent().unwrap().is_dir());
    assert!(!glossary_path.exists(), "File itself is created by the first load");
}

#[test]
fn test_load_missing_file_creates_it() {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("glossary.txt");
    let store = TermStore::new(glossary_path.clone(), 0).unwrap();

    let report = store.try_load().unwrap();
    assert!(report.created);
    assert!(report.terms.is_empty());
    assert!(glossary_path.exists(), "Missing glossary should be created");
    assert_eq!(fs::read_to_string(&glossary_path).unwrap(), "");

    // Second load sees the same empty file
    let report = store.try_load().unwrap();
    assert!(!report.created);
    assert!(report.terms.is_empty());
    assert!(store.load().is_empty());
}

#[test]
fn test_load_tolerates_malformed_lines() {
    let (_temp_dir, _path, store) = create_test_store("good::entry\nbroken line\n", 0);

    let report = store.try_load().unwrap();
    assert_eq!(report.terms.len(), 1);
    assert_eq!(report.terms.get("good"), Some("entry"));
    assert_eq!(report.malformed.len(), 1);
    assert_eq!(report.malformed[0].reason, MalformedReason::MissingDelimiter);

    assert_eq!(store.load(), report.terms);
}

#[test]
fn test_load_io_failure_returns_empty() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the file should be makes every read fail
    let glossary_path = temp_dir.path().join("glossary.txt");
    fs::create_dir(&glossary_path).unwrap();
    let store = TermStore::new(glossary_path, 0).unwrap();

    assert!(store.try_load().is_err(), "try_load should surface the I/O error");
    assert!(store.load().is_empty(), "load should fall back to an empty collection");
}

#[test]
fn test_save_then_load_round_trip() {
    let (_temp_dir, path, store) = create_test_store("", 0);

    let mut terms = TermCollection::new();
    terms.insert("recursion", "a function calling itself");
    terms.insert("scope", "where a name is visible::lexical or dynamic");
    terms.insert("multi", "line one\nline two");

    store.save(&terms).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3, "One line per entry");

    let loaded = store.load();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.get("recursion"), Some("a function calling itself"));
    assert_eq!(loaded.get("scope"), Some("where a name is visible::lexical or dynamic"));
    assert_eq!(loaded.get("multi"), Some("line one line two"));
}

#[test]
fn test_colon_terms_round_trip_through_file() {
    let (_temp_dir, path, store) = create_test_store("", 0);

    assert_eq!(
        store.modify(|terms| add_term(terms, "a:", "x")).unwrap(),
        Err(ValidationError::TrailingColonInTerm("a:".to_string()))
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    store.modify(|terms| add_term(terms, "a:b", ":x")).unwrap().unwrap();
    store.modify(|terms| add_term(terms, ":c", "y")).unwrap().unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get("a:b"), Some(":x"));
    assert_eq!(loaded.get(":c"), Some("y"));
}

#[test]
fn test_save_fully_overwrites() {
    let (_temp_dir, path, store) = create_test_store("old::entry\nstale::entry\n", 0);

    let mut terms = TermCollection::new();
    terms.insert("fresh", "entry");
    store.save(&terms).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh::entry\n");
}

#[test]
fn test_save_failure_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("glossary.txt");
    let store = TermStore::new(glossary_path.clone(), 0).unwrap();

    // Parent directory disappears underneath the store
    fs::remove_dir_all(temp_dir.path()).unwrap();

    let mut terms = TermCollection::new();
    terms.insert("lost", "write");
    let result = store.save(&terms);

    assert!(matches!(result, Err(StoreError::WriteFailed(_))));
    assert!(store.load().is_empty());
}

#[test]
fn test_modify_persists_on_success() {
    let (_temp_dir, path, store) = create_test_store("", 0);

    let outcome = store
        .modify(|terms| add_term(terms, "closure", "captures its environment"))
        .unwrap();

    assert!(outcome.is_ok());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "closure::captures its environment\n"
    );
}

#[test]
fn test_modify_does_not_write_on_rejection() {
    let (_temp_dir, path, store) = create_test_store("x::1\n", 3);

    let outcome = store.modify(|terms| add_term(terms, "x", "2")).unwrap();

    assert_eq!(outcome, Err(ValidationError::DuplicateTerm("x".to_string())));
    assert_eq!(fs::read_to_string(&path).unwrap(), "x::1\n");
    assert!(store.list_backups().unwrap().is_empty(), "Rejected change should not back up");
}

#[test]
fn test_modify_aborts_when_load_fails() {
    let temp_dir = TempDir::new().unwrap();
    let glossary_path = temp_dir.path().join("glossary.txt");
    fs::create_dir(&glossary_path).unwrap();
    let store = TermStore::new(glossary_path, 0).unwrap();

    let mut called = false;
    let result = store.modify(|terms| {
        called = true;
        add_term(terms, "a", "b")
    });

    assert!(result.is_err());
    assert!(!called, "Mutation must not run against an unreadable glossary");
}

#[test]
fn test_concurrent_modifications_are_serialised() {
    let (_temp_dir, _path, store) = create_test_store("", 0);
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .modify(|terms| add_term(terms, &format!("term{}", i), "defined"))
                    .unwrap()
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let report = store.try_load().unwrap();
    assert_eq!(report.terms.len(), 8, "No update may be lost");
    assert!(report.malformed.is_empty(), "File must stay parseable");
}

#[test]
fn test_save_creates_backup_of_previous_content() {
    let (_temp_dir, _path, store) = create_test_store("before::save\n", 5);

    let mut terms = TermCollection::new();
    terms.insert("after", "save");
    store.save(&terms).unwrap();

    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "before::save\n");
}

#[test]
fn test_no_backup_of_empty_file() {
    let (_temp_dir, _path, store) = create_test_store("", 5);

    store.save(&TermCollection::new()).unwrap();

    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn test_backup_filename_format() {
    let (_temp_dir, _path, store) = create_test_store("a::b\n", 5);

    let backup = store.create_timestamped_backup().unwrap().unwrap();
    let filename = backup.file_name().unwrap().to_str().unwrap();

    // "glossary.txt.2025-10-10_221500_042" -> "2025-10-10_221500_042"
    let timestamp = filename.strip_prefix("glossary.txt.").unwrap();
    let parsed = chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d_%H%M%S_%3f");
    assert!(parsed.is_ok(), "Timestamp should be valid chrono format: {}", timestamp);
}

#[test]
fn test_list_backups_sorted_newest_first() {
    let (_temp_dir, path, store) = create_test_store("first\n", 10);

    let backup1 = store.create_timestamped_backup().unwrap().unwrap();
    thread::sleep(Duration::from_millis(5));

    fs::write(&path, "second\n").unwrap();
    let backup2 = store.create_timestamped_backup().unwrap().unwrap();
    thread::sleep(Duration::from_millis(5));

    fs::write(&path, "third\n").unwrap();
    let backup3 = store.create_timestamped_backup().unwrap().unwrap();

    let backups = store.list_backups().unwrap();
    assert_eq!(backups, vec![backup3, backup2, backup1]);
}

#[test]
fn test_list_backups_ignores_invalid_files() {
    let (_temp_dir, _path, store) = create_test_store("a::b\n", 10);

    let valid = store.create_timestamped_backup().unwrap().unwrap();

    let backup_dir = store.backup_dir().to_path_buf();
    fs::write(backup_dir.join("random.txt"), "not a backup").unwrap();
    fs::write(backup_dir.join("glossary.txt.notimestamp"), "wrong format").unwrap();
    fs::write(backup_dir.join("glossary.txt.2025-99-99_invalid"), "bad date").unwrap();

    let backups = store.list_backups().unwrap();
    assert_eq!(backups, vec![valid]);
}

#[test]
fn test_cleanup_keeps_n_most_recent() {
    let (_temp_dir, path, store) = create_test_store("initial\n", 10);

    let mut backup_paths = Vec::new();
    for i in 1..=5 {
        fs::write(&path, format!("version {}\n", i)).unwrap();
        backup_paths.push(store.create_timestamped_backup().unwrap().unwrap());
        thread::sleep(Duration::from_millis(5));
    }

    let deleted = store.cleanup_old_backups(2).unwrap();
    assert_eq!(deleted, 3);

    let remaining = store.list_backups().unwrap();
    assert_eq!(remaining, vec![backup_paths[4].clone(), backup_paths[3].clone()]);
}

#[test]
fn test_saves_respect_retention() {
    let (_temp_dir, _path, store) = create_test_store("seed::value\n", 2);

    for i in 0..5 {
        store
            .modify(|terms| add_term(terms, &format!("t{}", i), "v"))
            .unwrap()
            .unwrap();
    }

    assert_eq!(store.list_backups().unwrap().len(), 2);
}

#[test]
fn test_restore_backup() {
    let (_temp_dir, path, store) = create_test_store("original::content\n", 10);

    let backup = store.create_timestamped_backup().unwrap().unwrap();
    thread::sleep(Duration::from_millis(5));

    fs::write(&path, "modified::content\n").unwrap();
    store.restore_backup(&backup).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "original::content\n");

    // A safety backup of the modified content was taken first
    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "modified::content\n");
}

#[test]
fn test_restore_nonexistent_backup_fails() {
    let (temp_dir, path, store) = create_test_store("keep::me\n", 10);

    let result = store.restore_backup(&temp_dir.path().join("nope.txt"));

    match result {
        Err(StoreError::BackupFailed(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("Expected BackupFailed error, got: {:?}", other),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep::me\n");
    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn test_restore_directory_path_fails() {
    let (temp_dir, _path, store) = create_test_store("keep::me\n", 10);
    let dir_path = temp_dir.path().join("some_directory");
    fs::create_dir(&dir_path).unwrap();

    match store.restore_backup(&dir_path) {
        Err(StoreError::BackupFailed(msg)) => assert!(msg.contains("not a file")),
        other => panic!("Expected BackupFailed error, got: {:?}", other),
    }
}
