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

//! Termbook
//!
//! A small educational web site: lessons on programming fundamentals, a
//! shared glossary kept in a plain text file, and a page that forwards
//! questions to a generative-language model.
//!
//! # Features
//!
//! - **Flat-file glossary:** One `term::definition` entry per line,
//!   readable and editable by hand
//! - **CRUD Operations:** Add, update or rename, and delete terms
//! - **Serialised Writes:** Each load-mutate-save cycle runs under a lock
//! - **Automatic Backups:** Timestamped backups before every glossary change
//! - **Atomic Operations:** A failed write leaves the previous glossary intact
//! - **AI Page:** Questions answered by Gemini when an API key is configured
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, parser, validation, glossary operations)
//! - **`store`:** File operations (reading, writing, atomic updates, backups)
//! - **`ai`:** Generative-language client and the service the web layer calls
//! - **`web`:** axum router, HTML rendering and page handlers
//! - **`settings`:** Startup configuration from CLI flags and environment
//!
//! # Examples
//!
//! ## Parsing a glossary
//!
//! ```
//! use termbook::core::parser::parse_glossary;
//!
//! let parsed = parse_glossary("loop::repeats a block\nnot an entry\n");
//! assert_eq!(parsed.terms.get("loop"), Some("repeats a block"));
//! assert_eq!(parsed.malformed.len(), 1);
//! ```
//!
//! ## Editing the glossary on disk
//!
//! ```no_run
//! use termbook::core::update_term;
//! use termbook::store::TermStore;
//!
//! let store = TermStore::new("glossary.txt".into(), 10)?;
//! let outcome = store.modify(|terms| update_term(terms, "loop", "iteration", "repeats a block"))?;
//! println!("{:?}", outcome);
//! # Ok::<(), termbook::store::StoreError>(())
//! ```

pub mod ai;
pub mod core;
pub mod settings;
pub mod store;
pub mod web;

// Re-export commonly used types for convenience
pub use core::{Flash, FlashLevel, Term, TermCollection};
pub use store::TermStore;
