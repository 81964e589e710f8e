// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::events::HistoryEventAttributes;

fn signal_event(id: i64) -> HistoryEvent {
    HistoryEvent::new(
        id,
        100,
        1,
        0,
        HistoryEventAttributes::WorkflowExecutionSignaled {
            signal_name: "go".into(),
            input: vec![],
            identity: "tester".into(),
        },
    )
}

#[test]
fn empty_buffer_reports_empty_and_no_signal() {
    let buf = BufferedEvents::new();
    assert!(buf.is_empty());
    assert!(!buf.contains_signal());
}

#[test]
fn push_then_take_drains_events_and_resets() {
    let mut buf = BufferedEvents::new();
    buf.push(signal_event(1));
    buf.push(signal_event(2));
    assert!(buf.contains_signal());

    let drained = buf.take();
    assert_eq!(drained.len(), 2);
    assert!(buf.is_empty());
}
