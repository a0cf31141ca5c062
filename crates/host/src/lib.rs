// Path: crates/host/src/lib.rs
#![forbid(unsafe_code)]

//! The address layer of the page store: a host with a stable identity that
//! owns the durable state and forwards operations to whichever logic build
//! is currently active.

pub mod config;
pub mod host;
pub mod journal;

pub use config::{load_config, ConfigError};
pub use host::StoreHost;
pub use journal::{EventJournal, EventRecord};
