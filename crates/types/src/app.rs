// Path: crates/types/src/app.rs

//! Core application-level data structures for the page store.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for an account interacting with the store.
///
/// Represented as a 32-byte array. The all-zero value is reserved as the
/// null account and is never a valid writer.
#[derive(
    Encode,
    Decode,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Default,
    Hash,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The reserved null account.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Returns true if this is the reserved null account.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parses an `AccountId` from a 64-character hex string.
    ///
    /// This is the format used for accounts in configuration files.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = hex::decode(s).map_err(|e| format!("invalid account hex: {}", e))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "account hex must decode to exactly 32 bytes".to_string())?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for AccountId {
    /// Allows treating the `AccountId` as a byte slice.
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    /// Allows creating an `AccountId` directly from a 32-byte array.
    fn from(raw: [u8; 32]) -> Self {
        Self(raw)
    }
}

/// The full stored record of a single page, assembled from its three keys.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode, Default)]
pub struct PageInfo {
    /// The page content. Empty for a never-written or deleted page.
    pub content: String,
    /// The height marker of the most recent write. Zero for a never-written
    /// or deleted page.
    pub last_modified: u64,
    /// Whether the page is currently registered. This flag, not the content
    /// or the marker, is the authoritative liveness signal.
    pub exists: bool,
}

/// One page of enumeration results with contents and markers attached.
///
/// The three sequences are parallel: entry `i` of each describes the same
/// page, in registry slot order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageBatch {
    /// Page ids in slot order.
    pub ids: Vec<String>,
    /// Contents, parallel to `ids`.
    pub contents: Vec<String>,
    /// Last-modified markers, parallel to `ids`.
    pub modified: Vec<u64>,
}
