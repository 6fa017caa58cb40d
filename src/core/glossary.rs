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

//! Glossary mutation operations
//!
//! Add, update/rename and delete, applied to an in-memory `TermCollection`.
//! These functions never touch the filesystem: the store loads the
//! collection, one of these runs, and the store writes the result back
//! only if it returned `Ok`.
//!
//! Inputs are raw form values; each one is trimmed here.

use std::fmt;

use crate::core::types::TermCollection;
use crate::core::validator::{required, validate_term_name, ValidationError};

/// What a successful mutation did
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MutationOutcome {
    /// New term inserted
    Added { term: String },
    /// Same term, new definition
    DefinitionUpdated { term: String },
    /// Old key removed, new key inserted with the new definition
    Renamed { from: String, to: String },
    /// Term removed
    Deleted { term: String },
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Added { term } => write!(f, "Term '{}' added successfully!", term),
            MutationOutcome::DefinitionUpdated { term } => {
                write!(f, "Definition of term '{}' updated successfully!", term)
            }
            MutationOutcome::Renamed { from, to } => {
                write!(f, "Term '{}' renamed to '{}' and definition updated!", from, to)
            }
            MutationOutcome::Deleted { term } => write!(f, "Term '{}' deleted successfully!", term),
        }
    }
}

/// Adds a new term
///
/// # Errors
///
/// - `EmptyFields` if either field is blank after trimming
/// - `DelimiterInTerm` if the term contains `::`
/// - `TrailingColonInTerm` if the term ends with `:`
/// - `DuplicateTerm` if the term already exists (the existing definition is kept)
pub fn add_term(
    terms: &mut TermCollection,
    term: &str,
    definition: &str,
) -> Result<MutationOutcome, ValidationError> {
    let (Some(term), Some(definition)) = (required(term), required(definition)) else {
        return Err(ValidationError::EmptyFields);
    };

    validate_term_name(term)?;

    if terms.contains(term) {
        return Err(ValidationError::DuplicateTerm(term.to_string()));
    }

    terms.insert(term, definition);
    Ok(MutationOutcome::Added {
        term: term.to_string(),
    })
}

/// Updates a term's definition, renaming it when `new_term` differs
///
/// # Errors
///
/// - `MissingUpdateFields` if any of the three fields is blank
/// - `DelimiterInTerm` if `new_term` contains `::`
/// - `TrailingColonInTerm` if `new_term` ends with `:`
/// - `OriginalNotFound` if `original` is not in the collection
/// - `RenameCollision` if `new_term != original` and `new_term` already exists
pub fn update_term(
    terms: &mut TermCollection,
    original: &str,
    new_term: &str,
    new_definition: &str,
) -> Result<MutationOutcome, ValidationError> {
    let (Some(original), Some(new_term), Some(new_definition)) =
        (required(original), required(new_term), required(new_definition))
    else {
        return Err(ValidationError::MissingUpdateFields);
    };

    validate_term_name(new_term)?;

    if !terms.contains(original) {
        return Err(ValidationError::OriginalNotFound(original.to_string()));
    }

    if new_term == original {
        terms.insert(original, new_definition);
        return Ok(MutationOutcome::DefinitionUpdated {
            term: original.to_string(),
        });
    }

    if terms.contains(new_term) {
        return Err(ValidationError::RenameCollision(new_term.to_string()));
    }

    terms.remove(original);
    terms.insert(new_term, new_definition);
    Ok(MutationOutcome::Renamed {
        from: original.to_string(),
        to: new_term.to_string(),
    })
}

/// Deletes a term
///
/// # Errors
///
/// - `NoTermSelected` if the term is blank
/// - `TermNotFound` if the term is not in the collection
pub fn delete_term(terms: &mut TermCollection, term: &str) -> Result<MutationOutcome, ValidationError> {
    let Some(term) = required(term) else {
        return Err(ValidationError::NoTermSelected);
    };

    match terms.remove(term) {
        Some(_) => Ok(MutationOutcome::Deleted {
            term: term.to_string(),
        }),
        None => Err(ValidationError::TermNotFound(term.to_string())),
    }
}
