// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered events: history received before a prerequisite decision resolves.

use crate::events::HistoryEvent;

/// Events that have arrived but cannot yet be assigned a final event ID
/// because a decision task is still in flight. Must be flushed (applied)
/// before further replication is accepted onto the run.
#[derive(Debug, Clone, Default)]
pub struct BufferedEvents {
    events: Vec<HistoryEvent>,
}

impl BufferedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HistoryEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// Drain and return the buffered events, e.g. once the blocking decision
    /// has been failed out and a replacement scheduled (§4.6).
    pub fn take(&mut self) -> Vec<HistoryEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn contains_signal(&self) -> bool {
        self.events.iter().any(|e| {
            matches!(e.attributes, crate::events::HistoryEventAttributes::WorkflowExecutionSignaled { .. })
        })
    }
}

#[cfg(test)]
#[path = "buffered_events_tests.rs"]
mod tests;
