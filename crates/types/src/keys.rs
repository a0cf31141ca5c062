// Path: crates/types/src/keys.rs
//! Defines constants and builders for the well-known state keys of the store.
//!
//! This module is the single source of truth for the persistent layout. The
//! host and every logic build address state exclusively through these
//! constants, which is what keeps data written under one logic version
//! readable under every later one. Adding a key here is an upgrade-safe
//! extension; changing or reinterpreting an existing one is a schema break
//! and requires bumping [`STATE_SCHEMA`].

/// The version string of the persistent layout described by this module.
///
/// A logic build declaring a different schema must be rejected at upgrade
/// and at open: it would read these keys with a different interpretation.
pub const STATE_SCHEMA: &str = "v1";

/// The state key for the privileged writer's `AccountId`.
pub const WRITER_KEY: &[u8] = b"system::writer";

/// The state key for the `LogicManifest` of the active logic build.
pub const ACTIVE_LOGIC_KEY: &[u8] = b"system::logic::active";

/// The state key for the store's write-sequence height counter.
///
/// Persisting the counter keeps last-modified markers monotone across
/// process restarts.
pub const HEIGHT_KEY: &[u8] = b"system::height";

/// The state key prefix for page content, keyed by page id.
pub const PAGE_CONTENT_PREFIX: &[u8] = b"pages::content::";
/// The state key prefix for a page's last-modified height marker.
pub const PAGE_MODIFIED_PREFIX: &[u8] = b"pages::modified::";
/// The state key prefix for a page's existence flag.
pub const PAGE_EXISTS_PREFIX: &[u8] = b"pages::exists::";

/// The state key for the number of live registry slots.
///
/// This single counter is also the total page count: the two quantities are
/// equal by construction, so only one is stored.
pub const REGISTRY_LEN_KEY: &[u8] = b"registry::len";
/// The state key prefix for registry slots, keyed by big-endian slot index.
pub const REGISTRY_SLOT_PREFIX: &[u8] = b"registry::slot::";
/// The state key prefix for a page id's slot position (the reverse index).
pub const REGISTRY_POSITION_PREFIX: &[u8] = b"registry::pos::";

/// Builds the content key for a page id.
pub fn page_content_key(page_id: &str) -> Vec<u8> {
    [PAGE_CONTENT_PREFIX, page_id.as_bytes()].concat()
}

/// Builds the last-modified marker key for a page id.
pub fn page_modified_key(page_id: &str) -> Vec<u8> {
    [PAGE_MODIFIED_PREFIX, page_id.as_bytes()].concat()
}

/// Builds the existence flag key for a page id.
pub fn page_exists_key(page_id: &str) -> Vec<u8> {
    [PAGE_EXISTS_PREFIX, page_id.as_bytes()].concat()
}

/// Builds the registry slot key for a slot index.
///
/// Indices are encoded big-endian so that a lexicographic prefix scan over
/// [`REGISTRY_SLOT_PREFIX`] yields slots in ascending index order.
pub fn registry_slot_key(index: u64) -> Vec<u8> {
    [REGISTRY_SLOT_PREFIX, index.to_be_bytes().as_slice()].concat()
}

/// Builds the reverse-index key for a page id.
pub fn registry_position_key(page_id: &str) -> Vec<u8> {
    [REGISTRY_POSITION_PREFIX, page_id.as_bytes()].concat()
}
