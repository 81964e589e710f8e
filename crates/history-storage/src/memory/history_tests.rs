// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::events::HistoryEventAttributes;

fn signal_event(event_id: i64) -> HistoryEvent {
    HistoryEvent::new(
        event_id,
        1,
        event_id,
        0,
        HistoryEventAttributes::WorkflowExecutionSignaled { signal_name: "s".into(), input: vec![], identity: "t".into() },
    )
}

#[tokio::test]
async fn append_then_read_filters_by_event_id() {
    let store = InMemoryHistoryStore::new();
    let token: BranchToken = vec![1, 2, 3];
    store.append_history_nodes(&token, 0, &[signal_event(1), signal_event(2), signal_event(3)]).await.unwrap();

    let read = store.read_history(&token, 2).await.unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[1].event_id, 2);
}

#[tokio::test]
async fn reading_unknown_branch_fails() {
    let store = InMemoryHistoryStore::new();
    let err = store.read_history(&vec![9, 9, 9], 1).await.unwrap_err();
    assert_eq!(err, StorageError::BranchNotFound);
}

#[tokio::test]
async fn delete_branch_clears_its_events() {
    let store = InMemoryHistoryStore::new();
    let token: BranchToken = vec![1];
    store.append_history_nodes(&token, 0, &[signal_event(1)]).await.unwrap();
    store.delete_history_branch(&token, 0).await.unwrap();
    assert_eq!(store.read_history(&token, 1).await.unwrap_err(), StorageError::BranchNotFound);
}
