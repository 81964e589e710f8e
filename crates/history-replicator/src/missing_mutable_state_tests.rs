// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::clock::FakeClock;
use history_core::events::HistoryEventAttributes;
use history_core::execution_info::ExecutionInfo;
use history_core::identity::RunId;
use history_core::mutable_state::WorkflowSnapshot;
use history_core::replication_state::ReplicationState;
use history_core::version_history::{VersionHistories, VersionHistory};
use history_storage::cluster_metadata::StaticClusterMetadata;
use history_storage::execution_store::CreateMode;
use history_storage::memory::{InMemoryExecutionStore, InMemoryHistoryStore, InMemoryNamespaceCache, InMemoryShardStore};
use std::collections::BTreeMap;
use std::sync::Arc;

fn resources() -> Resources<FakeClock> {
    let cluster_metadata = StaticClusterMetadata::new("cluster-a", BTreeMap::from([(0, "cluster-a".to_string())]), 1, false);
    Resources::new(
        Arc::new(InMemoryExecutionStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryShardStore::new()),
        Arc::new(InMemoryNamespaceCache::new()),
        Arc::new(cluster_metadata),
        Arc::new(crate::cache::ExecutionCache::new(4, 16)),
        FakeClock::new(),
    )
}

fn signal(event_id: i64, version: i64, task_id: i64) -> HistoryEvent {
    HistoryEvent::new(event_id, version, task_id, 0, HistoryEventAttributes::WorkflowExecutionSignaled { signal_name: "s".to_string(), input: vec![], identity: "remote".to_string() })
}

async fn seed_running(resources: &Resources<FakeClock>, namespace_id: NamespaceId, workflow_id: &WorkflowId, run_id: RunId, last_write_version: i64) {
    let execution_info = ExecutionInfo::new(run_id, vec![7], "req-1");
    let replication_state = ReplicationState::new(last_write_version);
    let version_histories = VersionHistories::new(VersionHistory::new());
    let mut builder = history_core::mutable_state::MutableStateBuilder::new(namespace_id, execution_info, replication_state, version_histories);
    let task_id = builder.get_next_event_id();
    builder.add_decision_task_scheduled_event("default", false, task_id, 0);
    let (snapshot, _) = builder.close_transaction_as_snapshot(0, history_core::mutable_state::TransactionPolicy::Active);
    resources.execution_store.create_workflow_execution(workflow_id, CreateMode::BrandNew, snapshot).await.expect("seed running run");
}

async fn seed_closed(resources: &Resources<FakeClock>, namespace_id: NamespaceId, workflow_id: &WorkflowId, run_id: RunId, last_write_version: i64) {
    let execution_info = ExecutionInfo::new(run_id, vec![7], "req-1");
    let replication_state = ReplicationState::new(last_write_version);
    let version_histories = VersionHistories::new(VersionHistory::new());
    let mut builder = history_core::mutable_state::MutableStateBuilder::new(namespace_id, execution_info, replication_state, version_histories);
    let task_id = builder.get_next_event_id();
    builder.add_workflow_execution_terminated_event("closed for test", vec![], "test", task_id, 0);
    let (snapshot, _) = builder.close_transaction_as_snapshot(0, history_core::mutable_state::TransactionPolicy::Active);
    resources.execution_store.create_workflow_execution(workflow_id, CreateMode::BrandNew, snapshot).await.expect("seed closed run");
}

#[tokio::test]
async fn returns_retry_workflow_not_found_when_no_current_run_exists() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let cancel = CancellationToken::new();

    let err = apply_with_missing_mutable_state(&resources, &cancel, namespace_id, &workflow_id, 0, &[signal(1, 1, 1)], false).await.expect_err("no current run");
    assert!(matches!(err, ReplicatorError::RetryWorkflowNotFound { .. }));
}

#[tokio::test]
async fn stale_incoming_version_reapplies_signals_into_the_current_run() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    seed_running(&resources, namespace_id, &workflow_id, run_id, 5).await;
    let cancel = CancellationToken::new();

    apply_with_missing_mutable_state(&resources, &cancel, namespace_id, &workflow_id, 0, &[signal(1, 2, 1)], false)
        .await
        .expect("stale version reapplies rather than erroring");

    let snapshot: WorkflowSnapshot = resources.execution_store.get_workflow_execution(namespace_id, &workflow_id, run_id).await.expect("fetch");
    assert!(snapshot.execution_info.next_event_id > 2, "the signal must have been folded into the current run");
}

#[tokio::test]
async fn higher_incoming_version_terminates_and_retries_from_the_start_event() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    seed_running(&resources, namespace_id, &workflow_id, run_id, 5).await;
    let cancel = CancellationToken::new();

    let err = apply_with_missing_mutable_state(&resources, &cancel, namespace_id, &workflow_id, 0, &[signal(1, 9, 1)], false).await.expect_err("must retry from the start event");
    assert!(matches!(err, ReplicatorError::RetryWorkflowNotFound { next_event_id: 1, .. }));

    let snapshot = resources.execution_store.get_workflow_execution(namespace_id, &workflow_id, run_id).await.expect("fetch");
    assert!(snapshot.execution_info.state.is_closed(), "the superseded run must have been terminated");
}

#[tokio::test]
async fn equal_incoming_version_against_a_closed_current_run_retries_rather_than_succeeding() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    seed_closed(&resources, namespace_id, &workflow_id, run_id, 5).await;
    let cancel = CancellationToken::new();

    let snapshot = resources.execution_store.get_workflow_execution(namespace_id, &workflow_id, run_id).await.expect("fetch");
    let current_next_event_id = snapshot.execution_info.next_event_id;

    let err = apply_with_missing_mutable_state(&resources, &cancel, namespace_id, &workflow_id, 0, &[signal(1, 5, 1)], false).await.expect_err("closed current run at equal version must retry");
    assert!(matches!(err, ReplicatorError::RetryWorkflowNotFound { next_event_id, .. } if next_event_id == current_next_event_id));
}

#[tokio::test]
async fn reset_workflow_is_not_supported() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    seed_running(&resources, namespace_id, &workflow_id, run_id, 5).await;
    let cancel = CancellationToken::new();

    let err = apply_with_missing_mutable_state(&resources, &cancel, namespace_id, &workflow_id, 0, &[signal(1, 5, 1)], true).await.expect_err("reset is unsupported");
    assert!(matches!(err, ReplicatorError::Internal(_)));
}
