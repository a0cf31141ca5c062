// Path: crates/api/src/lib.rs

//! # PageVault API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # PageVault API
//!
//! Core traits and interfaces for the PageVault engine. This crate defines
//! the stable contract between the host (which owns state and the swappable
//! logic reference) and logic builds (which implement page semantics over
//! state they do not own).

/// The per-call execution context handed to logic builds.
pub mod context;
/// Re-exports all core error types from the central `pagevault-types` crate.
pub mod error;
/// The `PageLogic` interface every swappable logic build implements.
pub mod logic;
/// Core traits for state access, including `StateAccess` and `StateOverlay`.
pub mod state;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::context::CallContext;
    pub use crate::error::{CallError, ErrorCode, StateError, UpgradeError};
    pub use crate::logic::PageLogic;
    pub use crate::state::{StateAccess, StateOverlay};
}
