// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all persistent state.
//!
//! This module provides thin wrappers around `parity-scale-codec` (SCALE).
//! Centralizing the codec in the base `types` crate guarantees that the host
//! and every logic build, including builds compiled years apart, read and
//! write the exact same binary representation for every stored value. A
//! logic upgrade must never change how existing bytes decode.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical byte representation using SCALE.
///
/// Every value written to the page store goes through this function, so the
/// layout of stored data is identical regardless of which component produced
/// the write.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical byte representation using SCALE.
///
/// Fails fast on any decoding error, including trailing bytes. Malformed
/// stored data must surface as an error rather than be silently truncated.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
