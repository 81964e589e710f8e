// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use std::time::Duration;

fn key() -> ExecutionKey {
    ExecutionKey::new(NamespaceId::new(), WorkflowId::new("w"), RunId::new())
}

#[tokio::test]
async fn notify_wakes_a_waiting_poller() {
    let notifier = Arc::new(HistoryEventNotifier::new(4, 16));
    let k = key();
    let cancel = CancellationToken::new();

    let waiter = {
        let notifier = Arc::clone(&notifier);
        let k = k.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { notifier.wait_for_new_event(&k, &cancel).await })
    };

    // give the waiter a chance to register before we notify.
    tokio::time::sleep(Duration::from_millis(10)).await;
    notifier.notify_new_event(&k);

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await.expect("waiter completed").expect("task joined");
    assert!(result.is_ok());
}

#[tokio::test]
async fn cancellation_wakes_a_waiting_poller_with_no_notify() {
    let notifier = HistoryEventNotifier::new(4, 16);
    let k = key();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = notifier.wait_for_new_event(&k, &cancel).await;
    assert_eq!(result.unwrap_err(), ReplicatorError::Cancelled);
}

#[tokio::test]
async fn notify_with_nobody_waiting_is_a_harmless_no_op() {
    let notifier = HistoryEventNotifier::new(4, 16);
    notifier.notify_new_event(&key());
}
