// Path: crates/storage/src/memory.rs
//! A BTreeMap-backed state for tests and ephemeral stores.

use pagevault_api::state::{StateAccess, StateScanIter};
use pagevault_types::error::StateError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory state. Nothing survives a drop.
///
/// A BTreeMap rather than a hash map, so prefix scans come out in the
/// ascending key order the `StateAccess` contract promises.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the state holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateAccess for MemoryState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.entries.remove(key);
        Ok(())
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        Ok(keys.iter().map(|k| self.entries.get(k).cloned()).collect())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.entries.remove(key);
        }
        for (key, value) in inserts {
            self.entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let owned = prefix.to_vec();
        let iter = self
            .entries
            .range(owned.clone()..)
            .take_while(move |(k, _)| k.starts_with(&owned))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_reads_and_writes() {
        let mut state = MemoryState::new();
        state.insert(b"k1", b"v1").unwrap();

        assert_eq!(state.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(state.get(b"k2").unwrap(), None);
        assert_eq!(state.len(), 1);

        state.delete(b"k1").unwrap();
        assert!(state.is_empty());
        // Deleting an absent key is not an error.
        state.delete(b"k1").unwrap();
    }

    #[test]
    fn scans_are_ordered_and_stop_at_the_prefix_boundary() {
        let mut state = MemoryState::new();
        state.insert(b"a::2", b"x").unwrap();
        state.insert(b"a::1", b"y").unwrap();
        state.insert(b"b::1", b"z").unwrap();

        let keys: Vec<Vec<u8>> = state
            .prefix_scan(b"a::")
            .unwrap()
            .map(|r| r.unwrap().0.to_vec())
            .collect();
        assert_eq!(keys, vec![b"a::1".to_vec(), b"a::2".to_vec()]);
    }

    #[test]
    fn batch_apply_deletes_before_inserting() {
        let mut state = MemoryState::new();
        state.insert(b"gone", b"old").unwrap();

        state
            .batch_apply(
                &[(b"kept".to_vec(), b"new".to_vec())],
                &[b"gone".to_vec()],
            )
            .unwrap();

        assert_eq!(state.get(b"gone").unwrap(), None);
        assert_eq!(state.get(b"kept").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn batch_get_is_parallel_to_its_keys() {
        let mut state = MemoryState::new();
        state.insert(b"here", b"1").unwrap();

        let values = state
            .batch_get(&[b"missing".to_vec(), b"here".to_vec()])
            .unwrap();
        assert_eq!(values, vec![None, Some(b"1".to_vec())]);
    }
}
