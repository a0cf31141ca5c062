// Path: crates/host/src/host.rs
//! The address layer: stable identity, durable state, swappable logic.

use crate::journal::{EventJournal, EventRecord};
use pagevault_api::context::CallContext;
use pagevault_api::logic::PageLogic;
use pagevault_api::state::{StateAccess, StateOverlay};
use pagevault_logic::registry;
use pagevault_storage::RedbState;
use pagevault_types::app::{AccountId, PageBatch, PageInfo};
use pagevault_types::codec;
use pagevault_types::config::StoreConfig;
use pagevault_types::error::{CallError, StateError, UpgradeError};
use pagevault_types::events::StoreEvent;
use pagevault_types::keys;
use pagevault_types::manifest::{Features, LogicManifest};
use std::sync::Arc;

/// The stable face of the page store.
///
/// `StoreHost` owns the state backend and a swappable reference to the
/// active logic. It intercepts only its own operations (upgrades, writer
/// transfers, journal reads); everything else is forwarded to the logic 1:1,
/// and a forwarded failure comes back verbatim, never rewrapped.
///
/// Mutating operations take `&mut self`, reads take `&self`, so call
/// serialization is enforced by the borrow checker rather than a lock.
pub struct StoreHost {
    state: Box<dyn StateAccess>,
    logic: Arc<dyn PageLogic>,
    journal: EventJournal,
    height: u64,
}

impl std::fmt::Debug for StoreHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHost")
            .field("logic_version", &self.logic.version())
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl StoreHost {
    /// Opens a store over `state` under the given logic.
    ///
    /// A backend with no active manifest is fresh and gets the genesis
    /// treatment: writer, manifest and seed pages committed as the store's
    /// first call. Anything else is a reopen: state is authoritative, so
    /// nothing is replayed, but the stored schema, the registry structure
    /// and the logic version are all checked before the store is usable.
    pub fn open(
        state: Box<dyn StateAccess>,
        logic: Arc<dyn PageLogic>,
        config: &StoreConfig,
    ) -> Result<Self, CallError> {
        match state.get(keys::ACTIVE_LOGIC_KEY)? {
            Some(manifest_bytes) => Self::reopen(state, logic, &manifest_bytes),
            None => Self::genesis(state, logic, config),
        }
    }

    /// Opens a durable store at the state file named by `config`.
    pub fn open_durable(
        config: &StoreConfig,
        logic: Arc<dyn PageLogic>,
    ) -> Result<Self, CallError> {
        let state = RedbState::open(&config.state_file)?;
        Self::open(Box::new(state), logic, config)
    }

    fn genesis(
        state: Box<dyn StateAccess>,
        logic: Arc<dyn PageLogic>,
        config: &StoreConfig,
    ) -> Result<Self, CallError> {
        let writer = config
            .genesis
            .writer_account_id()
            .map_err(CallError::InvalidArgument)?;

        let mut host = Self {
            state,
            logic,
            journal: EventJournal::default(),
            height: 0,
        };

        let logic_ref = Arc::clone(&host.logic);
        let manifest = Self::manifest_for(logic_ref.as_ref(), 1);
        host.with_call(writer, |overlay, ctx| {
            let writer_bytes =
                codec::to_bytes_canonical(&writer).map_err(StateError::InvalidValue)?;
            let manifest_bytes =
                codec::to_bytes_canonical(&manifest).map_err(StateError::InvalidValue)?;
            overlay.insert(keys::WRITER_KEY, &writer_bytes)?;
            overlay.insert(keys::ACTIVE_LOGIC_KEY, &manifest_bytes)?;

            // Seed pages go through the normal write path so the registry
            // and the journal come up consistent.
            for seed in &config.genesis.pages {
                logic_ref.set_page(overlay, ctx, &seed.id, &seed.content)?;
            }
            Ok(())
        })?;

        log::info!(
            "[StoreHost] Genesis under logic {} with {} seed pages, writer 0x{}",
            host.logic.version(),
            config.genesis.pages.len(),
            hex::encode(&writer.as_ref()[..4])
        );
        Ok(host)
    }

    fn reopen(
        state: Box<dyn StateAccess>,
        logic: Arc<dyn PageLogic>,
        manifest_bytes: &[u8],
    ) -> Result<Self, CallError> {
        let stored: LogicManifest =
            codec::from_bytes_canonical(manifest_bytes).map_err(StateError::Decode)?;
        if stored.state_schema != logic.state_schema() {
            return Err(UpgradeError::SchemaMismatch {
                expected: stored.state_schema,
                got: logic.state_schema().to_string(),
            }
            .into());
        }
        registry::check(&*state)?;

        let height = match state.get(keys::HEIGHT_KEY)? {
            Some(bytes) => codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)?,
            None => 0,
        };

        let mut host = Self {
            state,
            logic,
            journal: EventJournal::default(),
            height,
        };

        // A binary shipping newer logic records the upgrade on open, the
        // same way an explicit upgrade call would.
        if stored.version != host.logic.version() {
            let writer = host.privileged_writer()?;
            let manifest = Self::manifest_for(host.logic.as_ref(), host.height + 1);
            host.commit_manifest(writer, stored.version.clone(), manifest)?;
            log::info!(
                "[StoreHost] Logic upgraded on open: {} -> {}",
                stored.version,
                host.logic.version()
            );
        }

        log::info!(
            "[StoreHost] Reopened store at height {} under logic {}",
            host.height,
            host.logic.version()
        );
        Ok(host)
    }

    fn manifest_for(logic: &dyn PageLogic, activated_at: u64) -> LogicManifest {
        LogicManifest {
            version: logic.version().to_string(),
            state_schema: logic.state_schema().to_string(),
            features: logic.features(),
            activated_at,
        }
    }

    // Runs one mutating call: logic against a copy-on-write overlay, then a
    // single atomic batch commit, then journal + height advance. A failing
    // call drops the overlay and commits nothing.
    fn with_call<F>(&mut self, caller: AccountId, run: F) -> Result<(), CallError>
    where
        F: FnOnce(&mut StateOverlay<'_>, &mut CallContext) -> Result<(), CallError>,
    {
        let next_height = self.height + 1;
        let mut overlay = StateOverlay::new(&*self.state);
        let mut ctx = CallContext::new(caller, next_height);

        run(&mut overlay, &mut ctx)?;

        // The height rides in the same batch as the call's writes.
        let height_bytes =
            codec::to_bytes_canonical(&next_height).map_err(StateError::InvalidValue)?;
        overlay.insert(keys::HEIGHT_KEY, &height_bytes)?;

        let (inserts, deletes) = overlay.into_ordered_batch();
        self.state.batch_apply(&inserts, &deletes)?;
        self.height = next_height;
        self.journal.record(next_height, ctx.into_events());
        Ok(())
    }

    /// Retires the active logic and activates `new_logic`.
    ///
    /// Only the privileged writer may upgrade. The target must report a
    /// non-empty version, a version different from the active one, and the
    /// same state schema; the stored data is never touched.
    pub fn upgrade_logic(
        &mut self,
        caller: AccountId,
        new_logic: Arc<dyn PageLogic>,
    ) -> Result<(), CallError> {
        if caller != self.privileged_writer()? {
            return Err(CallError::Unauthorized);
        }
        let current = self.active_manifest()?;
        if new_logic.version().is_empty() {
            return Err(
                UpgradeError::InvalidUpgrade("Upgrade target reports an empty version".into())
                    .into(),
            );
        }
        if new_logic.version() == current.version {
            return Err(UpgradeError::AlreadyActive(current.version).into());
        }
        if new_logic.state_schema() != current.state_schema {
            return Err(UpgradeError::SchemaMismatch {
                expected: current.state_schema,
                got: new_logic.state_schema().to_string(),
            }
            .into());
        }

        let manifest = Self::manifest_for(new_logic.as_ref(), self.height + 1);
        self.commit_manifest(caller, current.version.clone(), manifest)?;

        // Swap after the commit lands; a failed commit leaves the old
        // logic active and the stored manifest untouched.
        self.logic = new_logic;
        log::info!(
            "[StoreHost] Upgraded logic {} -> {} at height {}",
            current.version,
            self.logic.version(),
            self.height
        );
        Ok(())
    }

    fn commit_manifest(
        &mut self,
        caller: AccountId,
        previous_version: String,
        manifest: LogicManifest,
    ) -> Result<(), CallError> {
        let next_version = manifest.version.clone();
        self.with_call(caller, move |overlay, ctx| {
            let bytes = codec::to_bytes_canonical(&manifest).map_err(StateError::InvalidValue)?;
            overlay.insert(keys::ACTIVE_LOGIC_KEY, &bytes)?;
            ctx.emit(StoreEvent::LogicUpgraded {
                previous_version,
                next_version,
                block: ctx.block_height,
            });
            Ok(())
        })
    }

    /// Hands write authority to another account.
    ///
    /// Only the privileged writer may transfer, and neither the zero
    /// account nor the current writer is a valid target.
    pub fn transfer_writer(
        &mut self,
        caller: AccountId,
        new_writer: AccountId,
    ) -> Result<(), CallError> {
        let current = self.privileged_writer()?;
        if caller != current {
            return Err(CallError::Unauthorized);
        }
        if new_writer.is_zero() {
            return Err(CallError::InvalidArgument(
                "New writer cannot be the zero account".into(),
            ));
        }
        if new_writer == current {
            return Err(CallError::InvalidArgument(
                "New writer is already the privileged writer".into(),
            ));
        }

        self.with_call(caller, move |overlay, ctx| {
            let bytes =
                codec::to_bytes_canonical(&new_writer).map_err(StateError::InvalidValue)?;
            overlay.insert(keys::WRITER_KEY, &bytes)?;
            ctx.emit(StoreEvent::WriterTransferred {
                previous: current,
                next: new_writer,
                block: ctx.block_height,
            });
            Ok(())
        })?;

        log::info!(
            "[StoreHost] Writer transferred 0x{} -> 0x{}",
            hex::encode(&current.as_ref()[..4]),
            hex::encode(&new_writer.as_ref()[..4])
        );
        Ok(())
    }

    /// The account holding write authority.
    pub fn privileged_writer(&self) -> Result<AccountId, CallError> {
        let bytes = self
            .state
            .get(keys::WRITER_KEY)?
            .ok_or(StateError::KeyNotFound)?;
        Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)?)
    }

    /// The manifest of the logic recorded in state.
    pub fn active_manifest(&self) -> Result<LogicManifest, CallError> {
        let bytes = self
            .state
            .get(keys::ACTIVE_LOGIC_KEY)?
            .ok_or(StateError::KeyNotFound)?;
        Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)?)
    }

    /// The live logic's version string.
    pub fn version(&self) -> &str {
        self.logic.version()
    }

    /// The live logic's feature flags.
    pub fn features(&self) -> Features {
        self.logic.features()
    }

    /// Height of the last committed call, zero before genesis.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Every journaled event since this process opened the store.
    pub fn events(&self) -> &[EventRecord] {
        self.journal.records()
    }

    /// Journaled events from `sequence` onward.
    pub fn events_since(&self, sequence: u64) -> &[EventRecord] {
        self.journal.since(sequence)
    }

    /// The journal as JSON lines for off-store indexers.
    pub fn export_events_json(&self) -> Result<String, serde_json::Error> {
        self.journal.export_json()
    }

    /// Creates a page or replaces its content.
    pub fn set_page(
        &mut self,
        caller: AccountId,
        page_id: &str,
        content: &str,
    ) -> Result<(), CallError> {
        let logic = Arc::clone(&self.logic);
        self.with_call(caller, |overlay, ctx| {
            logic.set_page(overlay, ctx, page_id, content)
        })
    }

    /// Writes several pages in one all-or-nothing call.
    pub fn set_pages(
        &mut self,
        caller: AccountId,
        ids: &[String],
        contents: &[String],
    ) -> Result<(), CallError> {
        let logic = Arc::clone(&self.logic);
        self.with_call(caller, |overlay, ctx| {
            logic.set_pages(overlay, ctx, ids, contents)
        })
    }

    /// Removes a page.
    pub fn delete_page(&mut self, caller: AccountId, page_id: &str) -> Result<(), CallError> {
        let logic = Arc::clone(&self.logic);
        self.with_call(caller, |overlay, ctx| {
            logic.delete_page(overlay, ctx, page_id)
        })
    }

    /// The content of a page, empty if absent.
    pub fn page(&self, page_id: &str) -> Result<String, CallError> {
        self.logic.page(&*self.state, page_id)
    }

    /// Content, update marker and liveness of a page.
    pub fn page_info(&self, page_id: &str) -> Result<PageInfo, CallError> {
        self.logic.page_info(&*self.state, page_id)
    }

    /// Whether a live page with this id exists.
    pub fn page_exists(&self, page_id: &str) -> Result<bool, CallError> {
        self.logic.page_exists(&*self.state, page_id)
    }

    /// The update marker of a page's last write, zero if absent.
    pub fn last_updated(&self, page_id: &str) -> Result<u64, CallError> {
        self.logic.last_updated(&*self.state, page_id)
    }

    /// The number of live pages.
    pub fn total_pages(&self) -> Result<u64, CallError> {
        self.logic.total_pages(&*self.state)
    }

    /// All page ids in registry order.
    pub fn all_page_ids(&self) -> Result<Vec<String>, CallError> {
        self.logic.all_page_ids(&*self.state)
    }

    /// The page id at a registry position.
    pub fn page_id_by_index(&self, index: u64) -> Result<String, CallError> {
        self.logic.page_id_by_index(&*self.state, index)
    }

    /// A window of page ids.
    pub fn page_ids(&self, offset: u64, limit: u64) -> Result<Vec<String>, CallError> {
        self.logic.page_ids(&*self.state, offset, limit)
    }

    /// A window of page ids with current content and markers.
    pub fn pages_with_content(&self, offset: u64, limit: u64) -> Result<PageBatch, CallError> {
        self.logic.pages_with_content(&*self.state, offset, limit)
    }

    /// Ids containing `term` as a substring, in registry order.
    pub fn search_pages(&self, term: &str) -> Result<Vec<String>, CallError> {
        self.logic.search_pages(&*self.state, term)
    }
}
