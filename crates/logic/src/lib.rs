// Path: crates/logic/src/lib.rs
#![forbid(unsafe_code)]

pub mod hub;
pub mod registry;

pub use hub::{PageHub, LOGIC_VERSION};
