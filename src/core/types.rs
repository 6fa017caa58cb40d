//! src/core/types.rs
//!
//! Core type definitions for glossary management
//!
//! This module defines the fundamental types used throughout the application:
//! - `Term`: A single glossary entry (term + definition)
//! - `TermCollection`: The in-memory mapping for one load/save cycle
//! - `MalformedLine`: A line of the glossary file that could not be parsed
//! - `Flash` / `FlashLevel`: User-visible status messages
//!
//! The collection is ordered by term so that every save writes the file in
//! the same order, which keeps the glossary file diffable.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

/// Two-character sequence separating a term from its definition on disk.
pub const DELIMITER: &str = "::";

/// A single glossary entry
///
/// Both fields are stored trimmed. Terms are case-sensitive, so `Rust`
/// and `rust` are distinct entries.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Term {
    /// Unique key of the entry
    pub term: String,
    /// Free-text value associated with the term
    pub definition: String,
}

/// Mapping from term to definition
///
/// Keys are unique by construction. Iteration order is sorted by term.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TermCollection {
    entries: BTreeMap<String, String>,
}

impl TermCollection {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the collection holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `term` is present (exact, case-sensitive match)
    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Looks up the definition for `term`
    pub fn get(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(String::as_str)
    }

    /// Inserts or overwrites an entry, returning the previous definition
    pub fn insert(&mut self, term: impl Into<String>, definition: impl Into<String>) -> Option<String> {
        self.entries.insert(term.into(), definition.into())
    }

    /// Removes an entry, returning its definition if it was present
    pub fn remove(&mut self, term: &str) -> Option<String> {
        self.entries.remove(term)
    }

    /// Iterates over `(term, definition)` pairs in term order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Returns all entries as owned `Term` values
    pub fn terms(&self) -> Vec<Term> {
        self.entries
            .iter()
            .map(|(term, definition)| Term {
                term: term.clone(),
                definition: definition.clone(),
            })
            .collect()
    }

    /// Filters entries by a case-insensitive query on term or definition
    ///
    /// A blank query returns every entry.
    pub fn search(&self, query: &str) -> Vec<Term> {
        let query = query.trim();
        if query.is_empty() {
            return self.terms();
        }

        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(term, definition)| {
                term.to_lowercase().contains(&query_lower)
                    || definition.to_lowercase().contains(&query_lower)
            })
            .map(|(term, definition)| Term {
                term: term.clone(),
                definition: definition.clone(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a TermCollection {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TermCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Why a line of the glossary file was skipped
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MalformedReason {
    /// Non-empty line without the `::` delimiter
    MissingDelimiter,
    /// Delimiter present but the term or definition is blank after trimming
    EmptyField,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingDelimiter => write!(f, "missing '{}' delimiter", DELIMITER),
            MalformedReason::EmptyField => write!(f, "empty term or definition"),
        }
    }
}

/// A line of the glossary file that was skipped during parsing
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MalformedLine {
    /// 1-based line number
    pub line: usize,
    /// Raw (trimmed) content of the line
    pub content: String,
    /// Why it was skipped
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.reason, self.content)
    }
}

/// Category of a user-visible status message
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FlashLevel {
    /// Operation applied
    Success,
    /// Operation rejected, nothing changed
    Warning,
    /// Invalid request or failure
    Danger,
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashLevel::Success => write!(f, "success"),
            FlashLevel::Warning => write!(f, "warning"),
            FlashLevel::Danger => write!(f, "danger"),
        }
    }
}

impl FromStr for FlashLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(FlashLevel::Success),
            "warning" => Ok(FlashLevel::Warning),
            "danger" => Ok(FlashLevel::Danger),
            other => Err(format!("unknown flash level: {}", other)),
        }
    }
}

/// A status message shown once after a redirect
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Warning, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Danger, message: message.into() }
    }
}
