// Path: crates/logic/src/registry.rs
//! The page registry: a dense, swap-compacted slot sequence with a
//! reverse index, stored under the shared `registry::` keys.

use pagevault_api::state::StateAccess;
use pagevault_types::codec;
use pagevault_types::error::{CallError, StateError};
use pagevault_types::keys;

/// The number of live registry slots.
pub fn len(state: &dyn StateAccess) -> Result<u64, CallError> {
    match state.get(keys::REGISTRY_LEN_KEY)? {
        Some(bytes) => {
            Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?)
        }
        None => Ok(0),
    }
}

fn write_len(state: &mut dyn StateAccess, len: u64) -> Result<(), CallError> {
    let bytes = codec::to_bytes_canonical(&len).map_err(StateError::InvalidValue)?;
    state.insert(keys::REGISTRY_LEN_KEY, &bytes)?;
    Ok(())
}

/// The page id occupying a slot. Callers check bounds first; a hole inside
/// the bounds means the registry is corrupt.
pub fn slot(state: &dyn StateAccess, index: u64) -> Result<String, CallError> {
    let bytes = state
        .get(&keys::registry_slot_key(index))?
        .ok_or(StateError::KeyNotFound)?;
    Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?)
}

/// The slot a page id occupies, if it holds one.
pub fn position(state: &dyn StateAccess, page_id: &str) -> Result<Option<u64>, CallError> {
    match state.get(&keys::registry_position_key(page_id))? {
        Some(bytes) => Ok(Some(
            codec::from_bytes_canonical(&bytes).map_err(StateError::InvalidValue)?,
        )),
        None => Ok(None),
    }
}

/// Appends a page id to the tail slot and records its reverse index.
/// Returns the slot it was assigned.
pub fn append(state: &mut dyn StateAccess, page_id: &str) -> Result<u64, CallError> {
    let index = len(state)?;
    let id_bytes = codec::to_bytes_canonical(&page_id).map_err(StateError::InvalidValue)?;
    let index_bytes = codec::to_bytes_canonical(&index).map_err(StateError::InvalidValue)?;

    state.insert(&keys::registry_slot_key(index), &id_bytes)?;
    state.insert(&keys::registry_position_key(page_id), &index_bytes)?;
    write_len(state, index + 1)?;
    Ok(index)
}

/// Removes a page id by moving the tail slot's id into its hole.
///
/// O(1), at the cost of not preserving relative order among survivors. The
/// moved id's reverse index is rewritten; the tail slot and the removed id's
/// reverse index are dropped; the length shrinks by one.
pub fn swap_remove(state: &mut dyn StateAccess, page_id: &str) -> Result<(), CallError> {
    let index = position(state, page_id)?.ok_or(StateError::KeyNotFound)?;
    let last = len(state)?
        .checked_sub(1)
        .ok_or_else(|| StateError::Validation("Registry is empty".into()))?;

    if index != last {
        let moved_id = slot(state, last)?;
        let moved_bytes = codec::to_bytes_canonical(&moved_id).map_err(StateError::InvalidValue)?;
        let index_bytes = codec::to_bytes_canonical(&index).map_err(StateError::InvalidValue)?;
        state.insert(&keys::registry_slot_key(index), &moved_bytes)?;
        state.insert(&keys::registry_position_key(&moved_id), &index_bytes)?;
    }

    state.delete(&keys::registry_slot_key(last))?;
    state.delete(&keys::registry_position_key(page_id))?;
    write_len(state, last)?;
    Ok(())
}

/// All page ids in slot order, via one ordered scan over the slot prefix.
pub fn all_ids(state: &dyn StateAccess) -> Result<Vec<String>, CallError> {
    let mut ids = Vec::new();
    for entry in state.prefix_scan(keys::REGISTRY_SLOT_PREFIX)? {
        let (_, value) = entry?;
        ids.push(codec::from_bytes_canonical(&value).map_err(StateError::InvalidValue)?);
    }
    Ok(ids)
}

/// Full structural sweep of the registry.
///
/// Verifies that the slot count matches the stored length, that slots are
/// contiguous from zero, that every slotted id points back at its slot, and
/// that every slotted id carries a set existence flag. Run by the host when
/// it opens a store.
pub fn check(state: &dyn StateAccess) -> Result<(), StateError> {
    let expected = match len(state) {
        Ok(n) => n,
        Err(CallError::State(e)) => return Err(e),
        Err(e) => return Err(StateError::Validation(e.to_string())),
    };

    let mut seen: u64 = 0;
    for entry in state.prefix_scan(keys::REGISTRY_SLOT_PREFIX)? {
        let (key, value) = entry?;
        let want = keys::registry_slot_key(seen);
        if key.as_ref() != want.as_slice() {
            return Err(StateError::Validation(format!(
                "Registry slot keys are not contiguous at slot {}",
                seen
            )));
        }

        let id: String = codec::from_bytes_canonical(&value).map_err(StateError::InvalidValue)?;

        let pos_bytes = state
            .get(&keys::registry_position_key(&id))?
            .ok_or_else(|| {
                StateError::Validation(format!("Page '{}' has a slot but no position", id))
            })?;
        let pos: u64 =
            codec::from_bytes_canonical(&pos_bytes).map_err(StateError::InvalidValue)?;
        if pos != seen {
            return Err(StateError::Validation(format!(
                "Page '{}' is in slot {} but its position records {}",
                id, seen, pos
            )));
        }

        let flag_bytes = state.get(&keys::page_exists_key(&id))?.ok_or_else(|| {
            StateError::Validation(format!("Page '{}' is slotted but has no existence flag", id))
        })?;
        let exists: bool =
            codec::from_bytes_canonical(&flag_bytes).map_err(StateError::InvalidValue)?;
        if !exists {
            return Err(StateError::Validation(format!(
                "Page '{}' is slotted but flagged as deleted",
                id
            )));
        }

        seen += 1;
    }

    if seen != expected {
        return Err(StateError::Validation(format!(
            "Registry length records {} but {} slots exist",
            expected, seen
        )));
    }
    Ok(())
}
