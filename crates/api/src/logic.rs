// Path: crates/api/src/logic.rs
//! The trait boundary for swappable page-store logic.

use crate::context::CallContext;
use crate::state::StateAccess;
use pagevault_types::app::{PageBatch, PageInfo};
use pagevault_types::error::CallError;
use pagevault_types::manifest::Features;

/// The complete behavior of a page store, behind a swappable boundary.
///
/// Logic modules are stateless algorithm sets: every byte of durable data
/// lives behind the injected `StateAccess`, laid out under the shared key
/// schema in `pagevault_types::keys`. The host can therefore retire one
/// implementation and activate another without touching stored data, as long
/// as both report the same `state_schema`.
///
/// # Storage Invariant: Shared Key Layout
///
/// An implementation must read and write exclusively through the key builders
/// in `pagevault_types::keys`. Private ad-hoc keys would survive an upgrade
/// invisible to the successor logic and orphan their data.
///
/// Mutating methods receive a [`CallContext`] and must record every
/// observable effect through it; the host persists state changes and journals
/// events only after the method returns `Ok`.
pub trait PageLogic: Send + Sync {
    /// The semantic version string of this logic implementation.
    fn version(&self) -> &str;

    /// A string identifying the schema of the state this logic reads/writes.
    /// Activation is refused when this differs from the active schema.
    fn state_schema(&self) -> &str;

    /// Returns the feature flags this implementation supports.
    fn features(&self) -> Features;

    /// Creates a page or replaces its content.
    ///
    /// New pages are appended to the registry; existing pages keep their
    /// registry slot. Rejects an empty id, empty content, or content above
    /// the size cap.
    fn set_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
        content: &str,
    ) -> Result<(), CallError>;

    /// Writes several pages in one call, all-or-nothing.
    ///
    /// `ids` and `contents` are parallel slices. Every pair is validated
    /// before any page is written, so one bad entry fails the whole batch.
    fn set_pages(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        ids: &[String],
        contents: &[String],
    ) -> Result<(), CallError>;

    /// Removes a page and compacts the registry.
    ///
    /// Fails with `NotFound` if the page does not exist.
    fn delete_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
    ) -> Result<(), CallError>;

    /// The content of a page, or empty string if the page is absent.
    fn page(&self, state: &dyn StateAccess, page_id: &str) -> Result<String, CallError>;

    /// Content, update marker and liveness of a page in one lookup.
    /// Absent pages yield the zero-valued record with `exists: false`.
    fn page_info(&self, state: &dyn StateAccess, page_id: &str) -> Result<PageInfo, CallError>;

    /// Whether a live page with this id exists.
    fn page_exists(&self, state: &dyn StateAccess, page_id: &str) -> Result<bool, CallError>;

    /// The update marker of a page's last write, or zero if absent.
    fn last_updated(&self, state: &dyn StateAccess, page_id: &str) -> Result<u64, CallError>;

    /// The number of live pages.
    fn total_pages(&self, state: &dyn StateAccess) -> Result<u64, CallError>;

    /// All page ids in registry order.
    fn all_page_ids(&self, state: &dyn StateAccess) -> Result<Vec<String>, CallError>;

    /// The page id at a registry position. `OutOfRange` past the end.
    fn page_id_by_index(&self, state: &dyn StateAccess, index: u64) -> Result<String, CallError>;

    /// A window of page ids starting at `offset`, at most `limit` long.
    ///
    /// `OutOfRange` when `offset` is at or past the registry length; a zero
    /// `limit` yields an empty window.
    fn page_ids(
        &self,
        state: &dyn StateAccess,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<String>, CallError>;

    /// The `page_ids` window joined with current content and update markers,
    /// as parallel sequences. Contents are looked up fresh, so a page
    /// rewritten after claiming its slot shows its latest content.
    fn pages_with_content(
        &self,
        state: &dyn StateAccess,
        offset: u64,
        limit: u64,
    ) -> Result<PageBatch, CallError>;

    /// Ids containing `term` as a byte-wise, case-sensitive substring, in
    /// registry order. An empty term is an `InvalidArgument`.
    fn search_pages(&self, state: &dyn StateAccess, term: &str)
        -> Result<Vec<String>, CallError>;
}
