// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The history-event notifier (§9 "Concurrency shape"): a fan-out condition
//! variable for long-poll `PollMutableState` reads, keyed by
//! `(namespace_id, workflow_id, run_id)`. Not on the commit path — callers
//! that append events call [`HistoryEventNotifier::notify_new_event`] after
//! their commit lands, independent of whether anyone is waiting.

use history_core::identity::ExecutionKey;
use history_core::ReplicatorError;
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub struct HistoryEventNotifier {
    shards: Vec<SyncMutex<HashMap<ExecutionKey, Arc<Notify>>>>,
    capacity_per_shard: usize,
}

impl HistoryEventNotifier {
    pub fn new(num_shards: usize, capacity_per_shard: usize) -> Self {
        let num_shards = num_shards.max(1);
        Self { shards: (0..num_shards).map(|_| SyncMutex::new(HashMap::new())).collect(), capacity_per_shard }
    }

    fn shard_index(&self, key: &ExecutionKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    fn handle_for(&self, key: &ExecutionKey) -> Arc<Notify> {
        let idx = self.shard_index(key);
        let mut shard = self.shards[idx].lock();
        if shard.len() >= self.capacity_per_shard && !shard.contains_key(key) {
            prune_unreferenced(&mut shard);
        }
        Arc::clone(shard.entry(key.clone()).or_insert_with(|| Arc::new(Notify::new())))
    }

    /// Wake every waiter currently blocked on `key`. A no-op if nobody is
    /// waiting (the entry is created lazily on first wait).
    pub fn notify_new_event(&self, key: &ExecutionKey) {
        let idx = self.shard_index(key);
        let shard = self.shards[idx].lock();
        if let Some(notify) = shard.get(key) {
            notify.notify_waiters();
        }
    }

    /// Block until the next [`notify_new_event`](Self::notify_new_event) for
    /// `key`, or until `cancel` fires.
    pub async fn wait_for_new_event(&self, key: &ExecutionKey, cancel: &CancellationToken) -> Result<(), ReplicatorError> {
        let notify = self.handle_for(key);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ReplicatorError::Cancelled),
            _ = notify.notified() => Ok(()),
        }
    }
}

/// Drop entries nobody but the map itself is holding, making room in a
/// shard that's hit capacity. `Notify` handles are cheap to recreate, so
/// pruning never loses a real waiter: anyone already inside `wait_for_new_event`
/// holds their own clone and is unaffected.
fn prune_unreferenced(shard: &mut HashMap<ExecutionKey, Arc<Notify>>) {
    shard.retain(|_, notify| Arc::strong_count(notify) > 1);
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
