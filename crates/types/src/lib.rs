// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # PageVault Types
//!
//! This crate is the foundational library for the PageVault engine, containing
//! all core data structures, error types, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `pagevault-types` has minimal dependencies and is itself
//! a dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a stable, canonical definition for shared
//! types like `AccountId`, `PageInfo`, `LogicManifest`, and the error enums.
//!
//! Crucially, the [`keys`] module is the shared persistent layout: the host
//! and every logic build address state through the same key constants, which
//! is what keeps stored data readable across logic upgrades.

/// The maximum size in bytes for a single page content value.
pub const MAX_PAGE_CONTENT_BYTES: usize = 256 * 1024; // 256 KiB

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CallError> = std::result::Result<T, E>;

/// Core application-level data structures like `AccountId` and `PageInfo`.
pub mod app;
/// The canonical, deterministic binary codec for persistent state.
pub mod codec;
/// Shared configuration structures (`StoreConfig`, `GenesisConfig`).
pub mod config;
/// A unified set of all error types used across the engine.
pub mod error;
/// Structured events journaled by the host for off-store indexers.
pub mod events;
/// Constants and builders for the well-known state keys of the page store.
pub mod keys;
/// The on-store record describing the active logic build.
pub mod manifest;
