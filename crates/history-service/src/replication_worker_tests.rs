// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::clock::FakeClock;
use history_storage::cluster_metadata::StaticClusterMetadata;
use history_storage::memory::{InMemoryExecutionStore, InMemoryHistoryStore, InMemoryNamespaceCache, InMemoryShardStore};
use history_replicator::{ExecutionCache, Resources};
use std::collections::BTreeMap;

fn worker() -> (Arc<HistoryReplicator<FakeClock>>, Arc<Metrics>) {
    let cluster_metadata = StaticClusterMetadata::new("cluster-a", BTreeMap::from([(0, "cluster-a".to_string())]), 1, false);
    let resources = Resources::new(
        Arc::new(InMemoryExecutionStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryShardStore::new()),
        Arc::new(InMemoryNamespaceCache::new()),
        Arc::new(cluster_metadata),
        Arc::new(ExecutionCache::new(2, 16)),
        FakeClock::new(),
    );
    (Arc::new(HistoryReplicator::new(resources)), Arc::new(Metrics::new()))
}

#[tokio::test]
async fn sample_once_reports_cache_size_into_the_gauge() {
    let (replicator, metrics) = worker();
    let worker = ReplicationWorker::new(replicator, Arc::clone(&metrics), vec![0, 1], Duration::from_millis(10), 100);

    worker.sample_once().await;

    assert_eq!(metrics.execution_cache_size.get(), 0);
}

#[tokio::test]
async fn run_exits_promptly_once_cancelled() {
    let (replicator, metrics) = worker();
    let worker = ReplicationWorker::new(replicator, metrics, vec![0], Duration::from_millis(5), 10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(1), worker.run(cancel)).await.expect("run returns as soon as cancellation is already set");
}
