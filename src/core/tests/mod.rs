//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Glossary operation tests (add, update/rename, delete)
//! - Parser and serialiser tests
//! - Input validation tests
//! - Type tests (TermCollection, Term, Flash)
