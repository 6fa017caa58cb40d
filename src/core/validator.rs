// Copyright 2025 bakri (tidynest@proton.me)
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

//! Glossary input validation
//!
//! Every rejection a glossary operation can produce is a `ValidationError`.
//! These are always recovered locally: the web layer turns them into a
//! warning or danger flash message and nothing on disk changes.
//!
//! The only structural rule is the delimiter rule. A term containing `::`
//! would be split differently when the file is read back, so it is refused.
//! Definitions may contain `::` because lines split on the first delimiter.

use thiserror::Error;

use crate::core::types::{FlashLevel, DELIMITER};

/// Validation errors
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    /// Add called with a blank term or definition
    #[error("Term and definition cannot be empty.")]
    EmptyFields,

    /// Update called without all three fields
    #[error("To update, the original term, new term and new definition are all required.")]
    MissingUpdateFields,

    /// Delete called with a blank term
    #[error("No term selected for deletion.")]
    NoTermSelected,

    /// Add of a term that already exists
    #[error("The term '{0}' already exists. Use update if you want to change it.")]
    DuplicateTerm(String),

    /// Update of a term that does not exist
    #[error("Original term '{0}' was not found.")]
    OriginalNotFound(String),

    /// Rename onto a term that already exists
    #[error("The new term name '{0}' already exists. Choose another name.")]
    RenameCollision(String),

    /// Delete of a term that does not exist
    #[error("Term '{0}' was not found for deletion.")]
    TermNotFound(String),

    /// Term contains the on-disk delimiter
    #[error("Term '{0}' cannot contain the '::' delimiter.")]
    DelimiterInTerm(String),

    /// Term ends with ':', which would merge into the delimiter on disk
    #[error("Term '{0}' cannot end with ':'.")]
    TrailingColonInTerm(String),
}

impl ValidationError {
    /// Flash category used when this rejection is shown to the user
    ///
    /// Conflicts with existing data are warnings; malformed requests are
    /// dangers.
    pub fn level(&self) -> FlashLevel {
        match self {
            ValidationError::DuplicateTerm(_)
            | ValidationError::RenameCollision(_)
            | ValidationError::NoTermSelected
            | ValidationError::TermNotFound(_) => FlashLevel::Warning,
            ValidationError::EmptyFields
            | ValidationError::MissingUpdateFields
            | ValidationError::OriginalNotFound(_)
            | ValidationError::DelimiterInTerm(_)
            | ValidationError::TrailingColonInTerm(_) => FlashLevel::Danger,
        }
    }
}

/// Trims a form field, returning `None` when nothing is left
pub fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Checks that a (trimmed) term can be stored without breaking the file format
///
/// The term must not contain `::`, and must not end with `:`: `a:` would be
/// written as `a:::x` and read back as `a` -> `:x`.
pub fn validate_term_name(term: &str) -> Result<(), ValidationError> {
    if term.contains(DELIMITER) {
        return Err(ValidationError::DelimiterInTerm(term.to_string()));
    }
    if term.ends_with(':') {
        return Err(ValidationError::TrailingColonInTerm(term.to_string()));
    }
    Ok(())
}
