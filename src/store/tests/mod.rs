//! Store module tests
//!
//! - TermStore tests (load/save contract, backups, concurrency)
//! - Transaction tests (atomic commit, backups)

#[cfg(test)]
mod store_tests;
#[cfg(test)]
mod transaction_tests;
