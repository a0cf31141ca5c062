// Path: crates/logic/src/hub.rs
//! The current-generation logic module for the page store.

use pagevault_api::context::CallContext;
use pagevault_api::logic::PageLogic;
use pagevault_api::state::StateAccess;
use pagevault_types::app::{AccountId, PageBatch, PageInfo};
use pagevault_types::codec;
use pagevault_types::error::{CallError, StateError};
use pagevault_types::events::StoreEvent;
use pagevault_types::keys;
use pagevault_types::manifest::Features;
use pagevault_types::MAX_PAGE_CONTENT_BYTES;

use crate::registry;

/// The version string this logic build reports.
pub const LOGIC_VERSION: &str = "v2.0.0";

/// The stateless v2 page-store logic.
///
/// Every durable byte lives behind the injected `StateAccess` under the
/// shared key layout, so an instance can be discarded and replaced without
/// losing data. Write authority is checked here against `system::writer`
/// because the writer identity is part of that layout; the host forwards
/// calls without its own permission logic.
#[derive(Debug, Clone, Default)]
pub struct PageHub;

impl PageHub {
    fn ensure_writer(state: &dyn StateAccess, ctx: &CallContext) -> Result<(), CallError> {
        let bytes = state.get(keys::WRITER_KEY)?.ok_or(StateError::KeyNotFound)?;
        let writer: AccountId =
            codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?;
        if writer != ctx.caller {
            log::warn!(
                "[PageHub] Rejected write from non-writer 0x{}",
                hex::encode(&ctx.caller.as_ref()[..4])
            );
            return Err(CallError::Unauthorized);
        }
        Ok(())
    }

    fn validate_entry(page_id: &str, content: &str) -> Result<(), CallError> {
        if page_id.is_empty() {
            return Err(CallError::InvalidArgument("Page id cannot be empty".into()));
        }
        if content.is_empty() {
            return Err(CallError::InvalidArgument(
                "Page content cannot be empty".into(),
            ));
        }
        if content.len() > MAX_PAGE_CONTENT_BYTES {
            return Err(CallError::InvalidArgument(format!(
                "Page content is {} bytes, above the {} byte cap",
                content.len(),
                MAX_PAGE_CONTENT_BYTES
            )));
        }
        Ok(())
    }

    // Applies one validated write: registers a new id, always overwrites
    // content and marker, and emits the per-page event.
    fn write_page(
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
        content: &str,
    ) -> Result<(), CallError> {
        if !Self::read_flag(state, page_id)? {
            registry::append(state, page_id)?;
            let flag = codec::to_bytes_canonical(&true).map_err(StateError::InvalidValue)?;
            state.insert(&keys::page_exists_key(page_id), &flag)?;
        }

        let content_bytes =
            codec::to_bytes_canonical(&content).map_err(StateError::InvalidValue)?;
        let marker_bytes =
            codec::to_bytes_canonical(&ctx.block_height).map_err(StateError::InvalidValue)?;
        state.insert(&keys::page_content_key(page_id), &content_bytes)?;
        state.insert(&keys::page_modified_key(page_id), &marker_bytes)?;

        ctx.emit(StoreEvent::PageUpdated {
            page_id: page_id.to_string(),
            content: content.to_string(),
            block: ctx.block_height,
        });
        log::debug!(
            "[PageHub] Wrote page '{}' at height {}",
            page_id,
            ctx.block_height
        );
        Ok(())
    }

    fn read_flag(state: &dyn StateAccess, page_id: &str) -> Result<bool, CallError> {
        match state.get(&keys::page_exists_key(page_id))? {
            Some(bytes) => {
                Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?)
            }
            None => Ok(false),
        }
    }

    // Bounds shared by the paginated reads: offsets must land on a live
    // slot, a zero limit is an empty window, the end is clamped to the
    // registry length.
    fn window(state: &dyn StateAccess, offset: u64, limit: u64) -> Result<(u64, u64), CallError> {
        let len = registry::len(state)?;
        if offset >= len {
            return Err(CallError::OutOfRange { index: offset, len });
        }
        let end = offset.saturating_add(limit).min(len);
        Ok((offset, end))
    }

    fn contains(haystack: &str, term: &str) -> bool {
        let h = haystack.as_bytes();
        let t = term.as_bytes();
        if t.len() > h.len() {
            return false;
        }
        h.windows(t.len()).any(|w| w == t)
    }
}

impl PageLogic for PageHub {
    fn version(&self) -> &str {
        LOGIC_VERSION
    }

    fn state_schema(&self) -> &str {
        keys::STATE_SCHEMA
    }

    fn features(&self) -> Features {
        Features::PAGINATION | Features::SEARCH | Features::BATCH_WRITES
    }

    fn set_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
        content: &str,
    ) -> Result<(), CallError> {
        Self::ensure_writer(state, ctx)?;
        Self::validate_entry(page_id, content)?;
        Self::write_page(state, ctx, page_id, content)
    }

    fn set_pages(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        ids: &[String],
        contents: &[String],
    ) -> Result<(), CallError> {
        Self::ensure_writer(state, ctx)?;
        if ids.len() != contents.len() {
            return Err(CallError::InvalidArgument(format!(
                "Batch has {} ids but {} contents",
                ids.len(),
                contents.len()
            )));
        }
        if ids.is_empty() {
            return Err(CallError::InvalidArgument("Batch cannot be empty".into()));
        }

        // Validate every pair before touching state, so one bad entry
        // rejects the whole batch.
        for (page_id, content) in ids.iter().zip(contents) {
            Self::validate_entry(page_id, content)?;
        }
        for (page_id, content) in ids.iter().zip(contents) {
            Self::write_page(state, ctx, page_id, content)?;
        }

        ctx.emit(StoreEvent::PagesBatchUpdated {
            count: ids.len() as u64,
            block: ctx.block_height,
        });
        log::info!(
            "[PageHub] Batch of {} pages written at height {}",
            ids.len(),
            ctx.block_height
        );
        Ok(())
    }

    fn delete_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
    ) -> Result<(), CallError> {
        Self::ensure_writer(state, ctx)?;
        if !Self::read_flag(state, page_id)? {
            return Err(CallError::NotFound(page_id.to_string()));
        }

        state.delete(&keys::page_content_key(page_id))?;
        state.delete(&keys::page_modified_key(page_id))?;
        state.delete(&keys::page_exists_key(page_id))?;
        registry::swap_remove(state, page_id)?;

        ctx.emit(StoreEvent::PageDeleted {
            page_id: page_id.to_string(),
            block: ctx.block_height,
        });
        log::info!(
            "[PageHub] Deleted page '{}' at height {}",
            page_id,
            ctx.block_height
        );
        Ok(())
    }

    fn page(&self, state: &dyn StateAccess, page_id: &str) -> Result<String, CallError> {
        match state.get(&keys::page_content_key(page_id))? {
            Some(bytes) => {
                Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?)
            }
            None => Ok(String::new()),
        }
    }

    fn page_info(&self, state: &dyn StateAccess, page_id: &str) -> Result<PageInfo, CallError> {
        let lookups = vec![
            keys::page_content_key(page_id),
            keys::page_modified_key(page_id),
            keys::page_exists_key(page_id),
        ];
        let mut values = state.batch_get(&lookups)?.into_iter();

        let mut info = PageInfo::default();
        if let Some(Some(bytes)) = values.next() {
            info.content = codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?;
        }
        if let Some(Some(bytes)) = values.next() {
            info.last_modified =
                codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?;
        }
        if let Some(Some(bytes)) = values.next() {
            info.exists = codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?;
        }
        Ok(info)
    }

    fn page_exists(&self, state: &dyn StateAccess, page_id: &str) -> Result<bool, CallError> {
        Self::read_flag(state, page_id)
    }

    fn last_updated(&self, state: &dyn StateAccess, page_id: &str) -> Result<u64, CallError> {
        match state.get(&keys::page_modified_key(page_id))? {
            Some(bytes) => {
                Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?)
            }
            None => Ok(0),
        }
    }

    fn total_pages(&self, state: &dyn StateAccess) -> Result<u64, CallError> {
        registry::len(state)
    }

    fn all_page_ids(&self, state: &dyn StateAccess) -> Result<Vec<String>, CallError> {
        registry::all_ids(state)
    }

    fn page_id_by_index(&self, state: &dyn StateAccess, index: u64) -> Result<String, CallError> {
        let len = registry::len(state)?;
        if index >= len {
            return Err(CallError::OutOfRange { index, len });
        }
        registry::slot(state, index)
    }

    fn page_ids(
        &self,
        state: &dyn StateAccess,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<String>, CallError> {
        let (start, end) = Self::window(state, offset, limit)?;
        let mut ids = Vec::with_capacity((end - start) as usize);
        for index in start..end {
            ids.push(registry::slot(state, index)?);
        }
        Ok(ids)
    }

    fn pages_with_content(
        &self,
        state: &dyn StateAccess,
        offset: u64,
        limit: u64,
    ) -> Result<PageBatch, CallError> {
        let ids = self.page_ids(state, offset, limit)?;

        // Contents and markers are fetched fresh, so a page rewritten after
        // claiming its slot shows its latest state.
        let mut lookups = Vec::with_capacity(ids.len() * 2);
        for page_id in &ids {
            lookups.push(keys::page_content_key(page_id));
            lookups.push(keys::page_modified_key(page_id));
        }
        let mut values = state.batch_get(&lookups)?.into_iter();

        let mut batch = PageBatch {
            ids,
            contents: Vec::new(),
            modified: Vec::new(),
        };
        while let (Some(content), Some(marker)) = (values.next(), values.next()) {
            batch.contents.push(match content {
                Some(bytes) => {
                    codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?
                }
                None => String::new(),
            });
            batch.modified.push(match marker {
                Some(bytes) => {
                    codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?
                }
                None => 0,
            });
        }
        Ok(batch)
    }

    fn search_pages(
        &self,
        state: &dyn StateAccess,
        term: &str,
    ) -> Result<Vec<String>, CallError> {
        if term.is_empty() {
            return Err(CallError::InvalidArgument(
                "Search term cannot be empty".into(),
            ));
        }

        let ids = registry::all_ids(state)?;

        // Two passes: count first so the result allocates once.
        let matches = ids.iter().filter(|id| Self::contains(id, term)).count();
        let mut found = Vec::with_capacity(matches);
        for id in ids {
            if Self::contains(&id, term) {
                found.push(id);
            }
        }
        Ok(found)
    }
}
