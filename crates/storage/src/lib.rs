// Path: crates/storage/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! State backends for the page store: an in-memory map for tests and
//! ephemeral stores, and a redb-backed file for durable ones. Both expose
//! the same `StateAccess` surface, so a host can be pointed at either.

pub mod memory;
pub mod redb_state;

pub use memory::MemoryState;
pub use redb_state::RedbState;
