// Path: crates/host/tests/common/mod.rs
//! Shared fixtures: well-known accounts, config builders, and logic builds
//! standing in for other generations of the store.
#![allow(dead_code)]

use pagevault_api::context::CallContext;
use pagevault_api::logic::PageLogic;
use pagevault_api::state::StateAccess;
use pagevault_logic::registry;
use pagevault_types::app::{AccountId, PageBatch, PageInfo};
use pagevault_types::codec;
use pagevault_types::config::{GenesisConfig, SeedPage, StoreConfig};
use pagevault_types::error::{CallError, StateError};
use pagevault_types::events::StoreEvent;
use pagevault_types::keys;
use pagevault_types::manifest::Features;

pub const WRITER: AccountId = AccountId([1u8; 32]);
pub const INTRUDER: AccountId = AccountId([9u8; 32]);

pub fn config_with_pages(state_file: &str, pages: &[(&str, &str)]) -> StoreConfig {
    StoreConfig {
        state_file: state_file.to_string(),
        genesis: GenesisConfig {
            writer: hex::encode(WRITER.0),
            pages: pages
                .iter()
                .map(|(id, content)| SeedPage {
                    id: (*id).to_string(),
                    content: (*content).to_string(),
                })
                .collect(),
        },
    }
}

pub fn base_config() -> StoreConfig {
    config_with_pages("vault.redb", &[])
}

/// The store's previous logic generation, kept minimal on purpose.
///
/// It shares the key layout with the current build but predates batching,
/// pagination and search, so those calls fail with its own error text.
/// Running it against a store and then upgrading proves the data stays put.
pub struct LegacyV1;

impl LegacyV1 {
    fn ensure_writer(state: &dyn StateAccess, ctx: &CallContext) -> Result<(), CallError> {
        let bytes = state.get(keys::WRITER_KEY)?.ok_or(StateError::KeyNotFound)?;
        let writer: AccountId =
            codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?;
        if writer != ctx.caller {
            return Err(CallError::Unauthorized);
        }
        Ok(())
    }

    fn unsupported(call: &str) -> CallError {
        CallError::InvalidArgument(format!("{} is not supported by logic v1.0.0", call))
    }
}

impl PageLogic for LegacyV1 {
    fn version(&self) -> &str {
        "v1.0.0"
    }

    fn state_schema(&self) -> &str {
        keys::STATE_SCHEMA
    }

    fn features(&self) -> Features {
        Features::empty()
    }

    fn set_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
        content: &str,
    ) -> Result<(), CallError> {
        Self::ensure_writer(state, ctx)?;
        if page_id.is_empty() || content.is_empty() {
            return Err(CallError::InvalidArgument(
                "Page id and content must be non-empty".into(),
            ));
        }

        let exists_key = keys::page_exists_key(page_id);
        if state.get(&exists_key)?.is_none() {
            registry::append(state, page_id)?;
            let flag = codec::to_bytes_canonical(&true).map_err(StateError::InvalidValue)?;
            state.insert(&exists_key, &flag)?;
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
        Ok(())
    }

    fn set_pages(
        &self,
        _state: &mut dyn StateAccess,
        _ctx: &mut CallContext,
        _ids: &[String],
        _contents: &[String],
    ) -> Result<(), CallError> {
        Err(Self::unsupported("set_pages"))
    }

    fn delete_page(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut CallContext,
        page_id: &str,
    ) -> Result<(), CallError> {
        Self::ensure_writer(state, ctx)?;
        if state.get(&keys::page_exists_key(page_id))?.is_none() {
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
        Ok(PageInfo {
            content: self.page(state, page_id)?,
            last_modified: self.last_updated(state, page_id)?,
            exists: self.page_exists(state, page_id)?,
        })
    }

    fn page_exists(&self, state: &dyn StateAccess, page_id: &str) -> Result<bool, CallError> {
        Ok(state.get(&keys::page_exists_key(page_id))?.is_some())
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
        _state: &dyn StateAccess,
        _offset: u64,
        _limit: u64,
    ) -> Result<Vec<String>, CallError> {
        Err(Self::unsupported("page_ids"))
    }

    fn pages_with_content(
        &self,
        _state: &dyn StateAccess,
        _offset: u64,
        _limit: u64,
    ) -> Result<PageBatch, CallError> {
        Err(Self::unsupported("pages_with_content"))
    }

    fn search_pages(
        &self,
        _state: &dyn StateAccess,
        _term: &str,
    ) -> Result<Vec<String>, CallError> {
        Err(Self::unsupported("search_pages"))
    }
}

/// A logic build that only reports metadata. Used to probe the host's
/// upgrade validation; none of its operations are ever reached.
pub struct StubLogic {
    pub version: &'static str,
    pub schema: &'static str,
}

impl PageLogic for StubLogic {
    fn version(&self) -> &str {
        self.version
    }

    fn state_schema(&self) -> &str {
        self.schema
    }

    fn features(&self) -> Features {
        Features::empty()
    }

    fn set_page(
        &self,
        _state: &mut dyn StateAccess,
        _ctx: &mut CallContext,
        _page_id: &str,
        _content: &str,
    ) -> Result<(), CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn set_pages(
        &self,
        _state: &mut dyn StateAccess,
        _ctx: &mut CallContext,
        _ids: &[String],
        _contents: &[String],
    ) -> Result<(), CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn delete_page(
        &self,
        _state: &mut dyn StateAccess,
        _ctx: &mut CallContext,
        _page_id: &str,
    ) -> Result<(), CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn page(&self, _state: &dyn StateAccess, _page_id: &str) -> Result<String, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn page_info(&self, _state: &dyn StateAccess, _page_id: &str) -> Result<PageInfo, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn page_exists(&self, _state: &dyn StateAccess, _page_id: &str) -> Result<bool, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn last_updated(&self, _state: &dyn StateAccess, _page_id: &str) -> Result<u64, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn total_pages(&self, _state: &dyn StateAccess) -> Result<u64, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn all_page_ids(&self, _state: &dyn StateAccess) -> Result<Vec<String>, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn page_id_by_index(&self, _state: &dyn StateAccess, _index: u64) -> Result<String, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn page_ids(
        &self,
        _state: &dyn StateAccess,
        _offset: u64,
        _limit: u64,
    ) -> Result<Vec<String>, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn pages_with_content(
        &self,
        _state: &dyn StateAccess,
        _offset: u64,
        _limit: u64,
    ) -> Result<PageBatch, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }

    fn search_pages(
        &self,
        _state: &dyn StateAccess,
        _term: &str,
    ) -> Result<Vec<String>, CallError> {
        Err(CallError::InvalidArgument("stub".into()))
    }
}
