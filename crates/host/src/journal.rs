// Path: crates/host/src/journal.rs
//! The append-only record of everything the store has done.

use pagevault_types::events::StoreEvent;
use serde::{Deserialize, Serialize};

/// One journaled event, stamped with its global sequence number and the
/// height of the call that emitted it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    /// Position in the journal, starting at zero.
    pub sequence: u64,
    /// Height of the mutating call that emitted the event.
    pub height: u64,
    /// The event itself.
    pub event: StoreEvent,
}

/// In-memory, append-only event journal.
///
/// The journal is an observer, not a source of truth: the host rebuilds
/// nothing from it on reopen, so a fresh process starts with an empty
/// journal while the state keeps its height.
#[derive(Debug, Default)]
pub struct EventJournal {
    records: Vec<EventRecord>,
}

impl EventJournal {
    /// Appends the events of one committed call, in emission order.
    pub fn record(&mut self, height: u64, events: Vec<StoreEvent>) {
        for event in events {
            let sequence = self.records.len() as u64;
            log::debug!("[Journal] #{} {} at height {}", sequence, event.name(), height);
            self.records.push(EventRecord {
                sequence,
                height,
                event,
            });
        }
    }

    /// Every record, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records from `sequence` onward. Past-the-end sequences yield an
    /// empty slice.
    pub fn since(&self, sequence: u64) -> &[EventRecord] {
        usize::try_from(sequence)
            .ok()
            .and_then(|start| self.records.get(start..))
            .unwrap_or(&[])
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the journal holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the journal as JSON lines, one record per line, for
    /// off-store indexers.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
