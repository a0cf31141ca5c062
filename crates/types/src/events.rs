// Path: crates/types/src/events.rs

//! Structured events describing observable state changes in the page store.
//!
//! Events carry enough data for an off-store indexer to mirror the store
//! without reading state back: a content write includes the content itself.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A record of a single observable state change.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode, PartialEq, Eq)]
pub enum StoreEvent {
    /// A page was created or its content overwritten.
    PageUpdated {
        /// The page id.
        page_id: String,
        /// The content as written.
        content: String,
        /// The height of the committing call.
        block: u64,
    },

    /// A page was removed from the registry.
    PageDeleted {
        /// The page id.
        page_id: String,
        /// The height of the committing call.
        block: u64,
    },

    /// A batch write completed. Emitted after the per-page `PageUpdated`
    /// records of the same call.
    PagesBatchUpdated {
        /// The number of pages written by the batch.
        count: u64,
        /// The height of the committing call.
        block: u64,
    },

    /// The privileged writer changed.
    WriterTransferred {
        /// The writer before the transfer.
        previous: AccountId,
        /// The writer after the transfer.
        next: AccountId,
        /// The height of the committing call.
        block: u64,
    },

    /// The active logic build changed.
    LogicUpgraded {
        /// The version string of the replaced build.
        previous_version: String,
        /// The version string of the activated build.
        next_version: String,
        /// The height of the committing call.
        block: u64,
    },
}

impl StoreEvent {
    /// Returns the stable name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageUpdated { .. } => "PageUpdated",
            Self::PageDeleted { .. } => "PageDeleted",
            Self::PagesBatchUpdated { .. } => "PagesBatchUpdated",
            Self::WriterTransferred { .. } => "WriterTransferred",
            Self::LogicUpgraded { .. } => "LogicUpgraded",
        }
    }

    /// Returns the height of the call that produced this event.
    pub fn block(&self) -> u64 {
        match self {
            Self::PageUpdated { block, .. }
            | Self::PageDeleted { block, .. }
            | Self::PagesBatchUpdated { block, .. }
            | Self::WriterTransferred { block, .. }
            | Self::LogicUpgraded { block, .. } => *block,
        }
    }
}
