// Path: crates/api/src/error.rs
//! Re-exports all core error types from the central `pagevault-types` crate.

pub use pagevault_types::error::{CallError, ErrorCode, StateError, UpgradeError};
