// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn started() -> HistoryEvent {
    HistoryEvent::new(
        1,
        100,
        1000,
        0,
        HistoryEventAttributes::WorkflowExecutionStarted {
            workflow_type: "demo".into(),
            input: vec![],
            workflow_timeout_seconds: 60,
            decision_task_timeout_seconds: 10,
            continued_from_run_id: None,
            retry_policy: RetryPolicy::default(),
        },
    )
}

#[test]
fn is_start_event_requires_event_id_one_and_started_attrs() {
    assert!(started().is_start_event());

    let mut not_first = started();
    not_first.event_id = 2;
    assert!(!not_first.is_start_event());

    let signaled = HistoryEvent::new(
        1,
        100,
        1000,
        0,
        HistoryEventAttributes::WorkflowExecutionSignaled {
            signal_name: "go".into(),
            input: vec![],
            identity: "tester".into(),
        },
    );
    assert!(!signaled.is_start_event());
}

#[test]
fn is_terminal_covers_all_closing_variants() {
    let terminated = HistoryEvent::new(
        5,
        100,
        1000,
        0,
        HistoryEventAttributes::WorkflowExecutionTerminated {
            reason: "r".into(),
            details: vec![],
            identity: "history-service".into(),
        },
    );
    assert!(terminated.is_terminal());
    assert!(!started().is_terminal());
}
