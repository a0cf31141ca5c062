// Path: crates/api/src/state/mod.rs
//! Core traits for state access.
//!
//! This module defines the two interfaces through which all page data moves:
//! - `StateAccess`: a dyn-safe key-value contract implemented by backends.
//! - `StateOverlay`: a copy-on-write buffer over any `StateAccess`, used by
//!   the host to make each mutating call all-or-nothing.

use pagevault_types::error::StateError;
use std::sync::Arc;

// --- Type Aliases for common state patterns ---
/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state, in ascending
/// key order. `Sync` is omitted as iterators are stateful.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod overlay;

pub use accessor::*;
pub use overlay::*;
