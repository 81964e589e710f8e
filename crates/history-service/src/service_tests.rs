// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::clock::FakeClock;
use history_core::events::HistoryEventAttributes;
use history_core::identity::{NamespaceId, WorkflowId};
use history_core::HistoryEvent;
use history_replicator::{ExecutionCache, Resources};
use history_storage::cluster_metadata::StaticClusterMetadata;
use history_storage::memory::{InMemoryExecutionStore, InMemoryHistoryStore, InMemoryNamespaceCache, InMemoryShardStore};
use history_storage::shard_store::ReplicationTask;
use history_wire::messages::{SyncActivityRequest, SyncShardStatusRequest};
use std::collections::{BTreeMap, HashMap};

fn service() -> Service<FakeClock> {
    let cluster_metadata = StaticClusterMetadata::new("cluster-a", BTreeMap::from([(0, "cluster-a".to_string()), (1, "cluster-b".to_string())]), 2, true);
    let resources = Resources::new(
        Arc::new(InMemoryExecutionStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryShardStore::new()),
        Arc::new(InMemoryNamespaceCache::new()),
        Arc::new(cluster_metadata),
        Arc::new(ExecutionCache::new(4, 16)),
        FakeClock::new(),
    );
    Service::new(Arc::new(HistoryReplicator::new(resources)), Arc::new(Metrics::new()))
}

fn started(version: i64, task_id: i64) -> HistoryEvent {
    HistoryEvent::new(
        1,
        version,
        task_id,
        0,
        HistoryEventAttributes::WorkflowExecutionStarted {
            workflow_type: "demo".to_string(),
            input: vec![],
            workflow_timeout_seconds: 3600,
            decision_task_timeout_seconds: 10,
            continued_from_run_id: None,
            retry_policy: Default::default(),
        },
    )
}

fn base_request(namespace_id: NamespaceId, workflow_id: WorkflowId, run_id: history_core::RunId) -> ReplicateEventsRequest {
    ReplicateEventsRequest {
        source_cluster: "cluster-b".to_string(),
        namespace_id,
        workflow_execution: history_core::identity::WorkflowExecution::new(workflow_id, run_id),
        first_event_id: 1,
        next_event_id: 2,
        version: 100,
        replication_info: HashMap::new(),
        history: vec![started(100, 1)],
        new_run_history: None,
        event_store_version: 0,
        reset_workflow: false,
        new_run_ndc: false,
        force_buffer_events: false,
    }
}

#[tokio::test]
async fn replicate_events_increments_the_applied_counter_on_success() {
    let service = service();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = history_core::RunId::new();
    let cancel = CancellationToken::new();

    service.replicate_events(&cancel, base_request(namespace_id, workflow_id, run_id)).await.expect("seed run replicates");

    assert_eq!(service.metrics.events_applied_total.get(), 1);
}

fn scheduled(event_id: i64, version: i64) -> HistoryEvent {
    HistoryEvent::new(event_id, version, event_id, 0, HistoryEventAttributes::DecisionTaskScheduled { tasklist: "default".to_string(), bypass_task_generation: false })
}

#[tokio::test]
async fn process_replication_task_routes_conflicts_to_the_dlq_counter() {
    let service = service();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = history_core::RunId::new();
    let cancel = CancellationToken::new();

    service.replicate_events(&cancel, base_request(namespace_id, workflow_id.clone(), run_id)).await.expect("seed run");

    // Plant a bogus peer-ack claim via the public SyncActivity surface:
    // version 500 is even, so the two-cluster stride attributes it to
    // cluster-a (this cluster) itself, even though this run never wrote
    // past version 100 — an impossible claim once a peer shows up at 200.
    service
        .sync_activity(
            &cancel,
            SyncActivityRequest {
                namespace_id,
                workflow_execution: history_core::identity::WorkflowExecution::new(workflow_id.clone(), run_id),
                version: 500,
                scheduled_id: 10,
                scheduled_time_ms: 0,
                started_id: 10,
                started_time_ms: None,
                last_heartbeat_time_ms: 0,
                details: vec![],
                attempt: 1,
                last_failure: None,
                last_worker_identity: "test-worker".to_string(),
                version_history: None,
            },
        )
        .await
        .expect("sync_activity records the bogus high-water mark");

    let task = ReplicationTask { task_id: 1, namespace_id, workflow_id: workflow_id.clone(), run_id, event: scheduled(2, 200) };
    let err = service.process_replication_task(&cancel, 0, "cluster-b".to_string(), task).await.expect_err("impossible remote claim is a conflict");
    assert!(err.is_conflict());
    assert_eq!(service.metrics.dlq_routed_total.get(), 1);
}

#[tokio::test]
async fn sync_shard_status_does_not_touch_metrics() {
    let service = service();
    let request = SyncShardStatusRequest { source_cluster: "cluster-b".to_string(), shard_id: 0, timestamp_ms: 7 };
    service.sync_shard_status(request).await.expect("sync succeeds");
    assert_eq!(service.metrics.events_applied_total.get(), 0);
}
