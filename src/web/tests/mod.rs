//! Web module tests
//!
//! - Flash transport helpers
//! - Router tests driven through `tower::ServiceExt::oneshot`
//! - Team roster loading
