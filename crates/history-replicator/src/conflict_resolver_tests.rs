// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::clock::FakeClock;
use history_core::events::{HistoryEvent, HistoryEventAttributes};
use history_storage::cluster_metadata::StaticClusterMetadata;
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

fn started(event_id: i64, version: i64) -> HistoryEvent {
    HistoryEvent::new(
        event_id,
        version,
        event_id,
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

fn scheduled(event_id: i64, version: i64) -> HistoryEvent {
    HistoryEvent::new(event_id, version, event_id, 0, HistoryEventAttributes::DecisionTaskScheduled { tasklist: "default".to_string(), bypass_task_generation: false })
}

#[tokio::test]
async fn rebuild_replays_only_up_to_the_cut_point_and_carries_update_condition() {
    let resources = resources();
    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    let branch_token = vec![1, 2, 3];

    let history = vec![started(1, 5), scheduled(2, 5), scheduled(3, 5)];
    resources.history_store.append_history_nodes(&branch_token, 0, &history).await.expect("seed history");

    let rebuilt = rebuild_mutable_state(&resources, namespace_id, &workflow_id, run_id, &branch_token, 5, 2, 42).await.expect("rebuild succeeds");

    assert_eq!(rebuilt.get_next_event_id(), 3, "only events up to the cut point should be replayed");
    assert_eq!(rebuilt.get_update_condition(), 42, "update_condition must be carried from the caller's original read");
}
