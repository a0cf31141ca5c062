// Path: crates/types/src/manifest.rs
//! The on-store record describing the active logic build.

use crate::error::UpgradeError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// A bitmask of the optional operation families a logic build supports.
    ///
    /// The baseline CRUD surface is not flagged; flags describe what a build
    /// offers beyond it.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[serde(transparent)]
    pub struct Features: u32 {
        /// Offset/limit windows over the page registry.
        const PAGINATION = 0b0001;
        /// Substring search over page ids.
        const SEARCH = 0b0010;
        /// Multi-page writes in a single call.
        const BATCH_WRITES = 0b0100;
    }
}

impl Encode for Features {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        self.bits().encode_to(dest)
    }
}

impl Decode for Features {
    fn decode<I: parity_scale_codec::Input>(
        input: &mut I,
    ) -> Result<Self, parity_scale_codec::Error> {
        let bits = u32::decode(input)?;
        Self::from_bits(bits).ok_or_else(|| "Invalid bits for Features".into())
    }
}

impl Features {
    /// Returns the stable lowercase names of all set flags, in flag order.
    pub fn names(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.contains(Features::PAGINATION) {
            out.push("pagination".to_string());
        }
        if self.contains(Features::SEARCH) {
            out.push("search".to_string());
        }
        if self.contains(Features::BATCH_WRITES) {
            out.push("batch-writes".to_string());
        }
        out
    }

    /// Parses a list of feature name strings into a bitmask.
    pub fn from_strings(strings: &[String]) -> Result<Self, UpgradeError> {
        let mut features = Features::empty();
        for s in strings {
            match s.as_str() {
                "pagination" => features |= Features::PAGINATION,
                "search" => features |= Features::SEARCH,
                "batch-writes" => features |= Features::BATCH_WRITES,
                _ => {
                    return Err(UpgradeError::InvalidUpgrade(format!(
                        "Unknown feature: {}",
                        s
                    )))
                }
            }
        }
        Ok(features)
    }
}

/// The canonical on-store record of the active logic build.
///
/// Stored under [`crate::keys::ACTIVE_LOGIC_KEY`]; rewritten on every
/// upgrade. The host validates a proposed build against this record before
/// swapping the live reference.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq, Eq)]
pub struct LogicManifest {
    /// The version string the build reports, e.g. `"v2.0.0"`.
    pub version: String,
    /// The persistent-layout version the build was compiled against.
    pub state_schema: String,
    /// The operation families the build supports.
    pub features: Features,
    /// The height at which this build was activated.
    pub activated_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn manifest_roundtrip() {
        let manifest = LogicManifest {
            version: "v2.0.0".into(),
            state_schema: "v1".into(),
            features: Features::PAGINATION | Features::SEARCH,
            activated_at: 1,
        };
        let bytes = codec::to_bytes_canonical(&manifest).unwrap();
        let back: LogicManifest = codec::from_bytes_canonical(&bytes).unwrap();
        assert_eq!(manifest, back);
    }

    #[test]
    fn feature_names_match_flag_order() {
        let all = Features::PAGINATION | Features::SEARCH | Features::BATCH_WRITES;
        assert_eq!(all.names(), vec!["pagination", "search", "batch-writes"]);
        assert!(Features::empty().names().is_empty());
    }

    #[test]
    fn feature_strings_parse_back() {
        let parsed = Features::from_strings(&[
            "search".to_string(),
            "pagination".to_string(),
        ])
        .unwrap();
        assert_eq!(parsed, Features::PAGINATION | Features::SEARCH);
        assert!(Features::from_strings(&["telepathy".to_string()]).is_err());
    }

    #[test]
    fn unknown_feature_bits_fail_to_decode() {
        let bytes = codec::to_bytes_canonical(&0xFFFF_FFFFu32).unwrap();
        assert!(codec::from_bytes_canonical::<Features>(&bytes).is_err());
    }
}
