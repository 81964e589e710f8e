// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::clock::FakeClock;
use history_core::events::HistoryEventAttributes;
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

fn task() -> ReplicationTask {
    ReplicationTask {
        task_id: 1,
        namespace_id: history_core::identity::NamespaceId::new(),
        workflow_id: history_core::identity::WorkflowId::new("w1"),
        run_id: history_core::identity::RunId::new(),
        event: history_core::HistoryEvent::new(1, 1, 1, 0, HistoryEventAttributes::WorkflowExecutionSignaled { signal_name: "s".to_string(), input: vec![], identity: "remote".to_string() }),
    }
}

#[tokio::test]
async fn routes_a_task_to_the_shard_dlq() {
    let resources = resources();
    route_to_dlq(&resources, 0, "cluster-b".to_string(), task(), "conflict".to_string()).await.expect("route succeeds");

    let page = resources.shard_store.get_dlq_messages(0, None, 10).await.expect("fetch dlq");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].reason, "conflict");
}
