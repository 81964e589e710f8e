// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background per-shard maintenance loop.
//!
//! Actually shipping a drained replication task to a peer cluster is wire
//! transport and RPC dispatch (out of scope, §1 of the core spec) — this
//! process has no peer connections to push to or pull from. What it *can*
//! do honestly without one is keep an eye on its own shards: sample queue
//! depth so an operator (or this same process's `/metrics` endpoint) can
//! see replication falling behind, the same "read-mostly with background
//! refresh" shape the core spec gives the namespace/cluster caches (§5).

use history_core::clock::Clock;
use history_replicator::HistoryReplicator;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::metrics::Metrics;

pub struct ReplicationWorker<C: Clock> {
    replicator: Arc<HistoryReplicator<C>>,
    metrics: Arc<Metrics>,
    shard_ids: Vec<u32>,
    poll_interval: Duration,
    poll_batch_size: usize,
}

impl<C: Clock + 'static> ReplicationWorker<C> {
    pub fn new(replicator: Arc<HistoryReplicator<C>>, metrics: Arc<Metrics>, shard_ids: Vec<u32>, poll_interval: Duration, poll_batch_size: usize) -> Self {
        Self { replicator, metrics, shard_ids, poll_interval, poll_batch_size }
    }

    /// Runs until `cancel` fires. Intended to be spawned once at process
    /// startup; a single task round-robins every owned shard rather than
    /// spawning one task per shard, since this is a light sampling poll and
    /// not the hot ingest path.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(shard_count = self.shard_ids.len(), poll_interval_ms = self.poll_interval.as_millis() as u64, "replication worker starting");
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("replication worker shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    self.sample_once().await;
                }
            }
        }
    }

    async fn sample_once(&self) {
        self.metrics.execution_cache_size.set(self.replicator.execution_cache().len() as i64);
        for &shard_id in &self.shard_ids {
            match self.replicator.get_replication_messages(shard_id, 0, self.poll_batch_size).await {
                Ok(page) => {
                    self.metrics.replication_tasks_polled_total.inc_by(page.items.len() as u64);
                    if !page.items.is_empty() {
                        tracing::debug!(shard_id, queued = page.items.len(), "replication tasks pending delivery to peers");
                    }
                }
                Err(err) => {
                    tracing::warn!(shard_id, error = %err, "failed to sample replication queue depth");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "replication_worker_tests.rs"]
mod tests;
