// Path: crates/storage/src/redb_state.rs
//! A redb-backed durable state file.

use pagevault_api::state::{StateAccess, StateKVPair, StateScanIter};
use pagevault_types::error::StateError;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

// Single table, prefix-encoded keys. The key layout lives with the data
// model, not the backend.
const STATE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("STATE");

/// Durable state in a single redb file.
///
/// Every trait method runs in its own transaction; `batch_apply` is the one
/// multi-key commit and is what gives the host its all-or-nothing writes.
pub struct RedbState {
    db: Database,
}

impl RedbState {
    /// Opens the state file at `path`, creating it if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| StateError::Backend(e.to_string()))?;

        // Ensure the table exists so later reads never race its creation.
        let tx = db
            .begin_write()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        {
            tx.open_table(STATE)
                .map_err(|e| StateError::Backend(e.to_string()))?;
        }
        tx.commit().map_err(|e| StateError::Backend(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "Opened redb state file");
        Ok(Self { db })
    }
}

impl StateAccess for RedbState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        let table = tx
            .open_table(STATE)
            .map_err(|e| StateError::Backend(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| StateError::Backend(e.to_string()))?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        {
            let mut table = tx
                .open_table(STATE)
                .map_err(|e| StateError::Backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StateError::Backend(e.to_string()))?;
        }
        tx.commit().map_err(|e| StateError::Apply(e.to_string()))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        {
            let mut table = tx
                .open_table(STATE)
                .map_err(|e| StateError::Backend(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| StateError::Backend(e.to_string()))?;
        }
        tx.commit().map_err(|e| StateError::Apply(e.to_string()))
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        let table = tx
            .open_table(STATE)
            .map_err(|e| StateError::Backend(e.to_string()))?;

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let value = table
                .get(key.as_slice())
                .map_err(|e| StateError::Backend(e.to_string()))?;
            values.push(value.map(|guard| guard.value().to_vec()));
        }
        Ok(values)
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        {
            let mut table = tx
                .open_table(STATE)
                .map_err(|e| StateError::Backend(e.to_string()))?;
            for key in deletes {
                table
                    .remove(key.as_slice())
                    .map_err(|e| StateError::Backend(e.to_string()))?;
            }
            for (key, value) in inserts {
                table
                    .insert(key.as_slice(), value.as_slice())
                    .map_err(|e| StateError::Backend(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| StateError::Apply(e.to_string()))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StateError::Backend(e.to_string()))?;
        let table = tx
            .open_table(STATE)
            .map_err(|e| StateError::Backend(e.to_string()))?;

        // Materialized so the transaction does not outlive this call.
        let mut pairs: Vec<Result<StateKVPair, StateError>> = Vec::new();
        let range = table
            .range(prefix..)
            .map_err(|e| StateError::Backend(e.to_string()))?;
        for entry in range {
            let (key, value) = entry.map_err(|e| StateError::Backend(e.to_string()))?;
            if !key.value().starts_with(prefix) {
                break;
            }
            pairs.push(Ok((Arc::from(key.value()), Arc::from(value.value()))));
        }
        Ok(Box::new(pairs.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbState) {
        let dir = tempfile::tempdir().unwrap();
        let state = RedbState::open(dir.path().join("state.redb")).unwrap();
        (dir, state)
    }

    #[test]
    fn writes_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.redb");

        {
            let mut state = RedbState::open(&path).unwrap();
            state.insert(b"k", b"v").unwrap();
        }
        let state = RedbState::open(&path).unwrap();
        assert_eq!(state.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn missing_keys_read_as_none() {
        let (_dir, state) = open_temp();
        assert_eq!(state.get(b"nope").unwrap(), None);
    }

    #[test]
    fn scans_are_ordered_and_stop_at_the_prefix_boundary() {
        let (_dir, mut state) = open_temp();
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
    fn batch_apply_lands_in_one_commit() {
        let (_dir, mut state) = open_temp();
        state.insert(b"gone", b"old").unwrap();

        state
            .batch_apply(
                &[
                    (b"k1".to_vec(), b"v1".to_vec()),
                    (b"k2".to_vec(), b"v2".to_vec()),
                ],
                &[b"gone".to_vec()],
            )
            .unwrap();

        assert_eq!(state.get(b"gone").unwrap(), None);
        assert_eq!(
            state.batch_get(&[b"k1".to_vec(), b"k2".to_vec()]).unwrap(),
            vec![Some(b"v1".to_vec()), Some(b"v2".to_vec())],
        );
    }
}
