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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the glossary data structures and the rules that
//! keep them consistent:
//! - Type definitions for terms, collections and status messages
//! - The line-oriented glossary file parser and serialiser
//! - Input validation for glossary operations
//! - Add / update / delete operations on an in-memory collection
//!
//! Nothing here performs I/O, so every rule can be unit tested without a
//! filesystem or a running server.

pub mod glossary;
pub mod parser;
pub mod types;
pub mod validator;

pub use glossary::{add_term, delete_term, update_term, MutationOutcome};
pub use types::*;
pub use validator::ValidationError;

#[cfg(test)]
mod tests;
