// Path: crates/api/src/context.rs
//! Defines the stable context passed to logic modules during execution.

use pagevault_types::app::AccountId;
use pagevault_types::events::StoreEvent;

/// Per-call execution context handed to every mutating logic method.
///
/// Carries the authenticated caller and the update marker for the call, and
/// collects the events the call emits. Events only reach the host journal if
/// the call succeeds; a failing call's context is dropped with its overlay.
#[derive(Clone, Debug)]
pub struct CallContext {
    /// The `AccountId` of the entity invoking the current call.
    /// This is the authoritative source for permission checks within logic.
    pub caller: AccountId,
    /// The update marker assigned to this call. Recorded as `last_modified`
    /// on every page the call touches and stamped on every emitted event.
    pub block_height: u64,
    events: Vec<StoreEvent>,
}

impl CallContext {
    /// Creates a fresh context with an empty event buffer.
    pub fn new(caller: AccountId, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
            events: Vec::new(),
        }
    }

    /// Buffers an event emitted by the current call.
    pub fn emit(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    /// The events emitted so far.
    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    /// Consumes the context and yields the buffered events in emission order.
    pub fn into_events(self) -> Vec<StoreEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_buffered_in_emission_order() {
        let mut ctx = CallContext::new(AccountId::from([7u8; 32]), 42);
        ctx.emit(StoreEvent::PageDeleted {
            page_id: "one".into(),
            block: 42,
        });
        ctx.emit(StoreEvent::PagesBatchUpdated {
            count: 3,
            block: 42,
        });

        let events = ctx.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "PageDeleted");
        assert_eq!(events[1].name(), "PagesBatchUpdated");
    }
}
