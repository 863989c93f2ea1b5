//! # BarTab Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the BarTab API server and its companion binaries.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migration runner
//! - `ledger`: The ledger update protocol and receipt aggregation

pub mod auth;
pub mod db;
pub mod ledger;
pub mod models;

/// Current version of the BarTab shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
