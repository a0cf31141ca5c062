// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay for all-or-nothing call execution.

use crate::state::{StateAccess, StateKVPair, StateScanIter};
use pagevault_types::error::StateError;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Fuse, Peekable};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A batch of keys to be deleted from the state.
pub type StateDeletes = Vec<Vec<u8>>;

/// A complete set of state changes (inserts/updates and deletes) from a call.
pub type StateChangeSet = (StateInserts, StateDeletes);

/// Calculates the smallest byte vector strictly greater than every key that
/// starts with `prefix`. Returns None if the prefix is empty or all 0xFF.
fn next_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    if prefix.is_empty() {
        return None;
    }
    let mut upper = prefix.to_vec();
    for i in (0..upper.len()).rev() {
        if let Some(byte) = upper.get_mut(i) {
            if *byte != 0xFF {
                *byte += 1;
                upper.truncate(i + 1);
                return Some(upper);
            }
        }
    }
    None
}

/// Merges the ordered base scan with the ordered pending-write range.
/// Pending entries win on key collisions; pending deletions suppress base
/// entries.
struct MergingIterator<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    pending: Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>,
}

impl<'a> Iterator for MergingIterator<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let base_key = self
                .base
                .peek()
                .and_then(|res| res.as_ref().ok().map(|(k, _)| k.as_ref()));
            let pending_key = self.pending.peek().map(|(k, _)| k.as_slice());

            let order = match (base_key, pending_key) {
                (Some(b), Some(p)) => Some(b.cmp(p)),
                (Some(_), None) => Some(std::cmp::Ordering::Less),
                (None, Some(_)) => Some(std::cmp::Ordering::Greater),
                (None, None) => None,
            };

            match order {
                Some(std::cmp::Ordering::Less) => return self.base.next(),
                Some(std::cmp::Ordering::Greater) => {
                    if let Some((key, value_opt)) = self.pending.next() {
                        if let Some(value) = value_opt {
                            return Some(Ok((Arc::from(key.clone()), Arc::from(value.clone()))));
                        }
                        // A pending delete of a key the base never had.
                    }
                }
                Some(std::cmp::Ordering::Equal) => {
                    self.base.next();
                    if let Some((key, value_opt)) = self.pending.next() {
                        if let Some(value) = value_opt {
                            return Some(Ok((Arc::from(key.clone()), Arc::from(value.clone()))));
                        }
                    }
                }
                None => return None,
            }
        }
    }
}

/// An in-memory, copy-on-write overlay over any `StateAccess`.
///
/// Reads check the local pending-write cache first and fall through to the
/// underlying base state on a miss. Writes are captured locally and never
/// touch the base. The host runs every mutating call against an overlay and
/// commits [`StateOverlay::into_ordered_batch`] only if the call succeeded;
/// a failing call's overlay is simply dropped.
pub struct StateOverlay<'a> {
    base: &'a dyn StateAccess,
    // BTreeMap so the commit batch is in deterministic key order.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Returns true if no writes have been captured.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consumes the overlay and returns its writes in deterministic key
    /// order, split into the insert and delete batches expected by
    /// [`StateAccess::batch_apply`].
    pub fn into_ordered_batch(self) -> StateChangeSet {
        let mut inserts = Vec::new();
        let mut deletes = Vec::new();

        for (key, value_opt) in self.pending {
            match value_opt {
                Some(value) => inserts.push((key, value)),
                None => deletes.push(key),
            }
        }
        (inserts, deletes)
    }
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.pending.get(key) {
            // A cached Some is a pending write, a cached None a pending delete.
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.get(key)?);
        }
        Ok(results)
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.delete(key)?;
        }
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.prefix_scan(prefix)?.fuse().peekable();

        let start = Included(prefix.to_vec());
        let end = match next_prefix(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let pending = self.pending.range((start, end)).peekable();

        Ok(Box::new(MergingIterator { base, pending }))
    }
}
