// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution cache and per-run locking discipline (§4.1).
//!
//! Modeled as an arena owned by the cache (§9 "Cyclic references"): the
//! cache hands out `Arc<ExecutionContext>` handles keyed by run identity;
//! holding a context's lock is the sole license to mutate that run's
//! in-memory state. The cache never displaces a locked entry, and commits
//! are the caller's responsibility — this module only owns acquisition,
//! loading, and eviction.

use history_core::identity::ExecutionKey;
use history_core::mutable_state::{MutableStateBuilder, TransactionPolicy, WorkflowSnapshot};
use history_core::{HistoryEvent, ReplicatorError};
use history_storage::{ExecutionStore, StorageError};
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

/// One run's cached state, behind an async exclusive lock. `None` means
/// "not yet loaded from persistence"; [`ExecutionGuard::load`] fills it in
/// on first acquisition and every subsequent lock holder reuses the cached
/// value until it's evicted.
pub struct ExecutionContext {
    pub key: ExecutionKey,
    state: Arc<AsyncMutex<Option<MutableStateBuilder>>>,
}

impl ExecutionContext {
    fn new(key: ExecutionKey) -> Self {
        Self { key, state: Arc::new(AsyncMutex::new(None)) }
    }

    /// `ctx.Lock(cancellationToken)` (§4.1): fails with `Cancelled` if the
    /// token fires before the lock is acquired.
    pub async fn lock(&self, cancel: &CancellationToken) -> Result<ExecutionGuard, ReplicatorError> {
        let state = Arc::clone(&self.state);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ReplicatorError::Cancelled),
            guard = state.lock_owned() => Ok(ExecutionGuard { key: self.key.clone(), guard }),
        }
    }

    /// Non-blocking acquisition, used only by the cache's eviction sweep to
    /// find entries nobody currently holds.
    fn try_lock(&self) -> Option<ExecutionGuard> {
        Arc::clone(&self.state).try_lock_owned().ok().map(|guard| ExecutionGuard { key: self.key.clone(), guard })
    }
}

/// A held lock on one run, with access to its (possibly not-yet-loaded)
/// cached state.
pub struct ExecutionGuard {
    pub key: ExecutionKey,
    guard: tokio::sync::OwnedMutexGuard<Option<MutableStateBuilder>>,
}

impl ExecutionGuard {
    pub fn is_loaded(&self) -> bool {
        self.guard.is_some()
    }

    pub fn get(&self) -> Option<&MutableStateBuilder> {
        self.guard.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut MutableStateBuilder> {
        self.guard.as_mut()
    }

    /// Replace the cached state outright, used after a `CreateWorkflowExecution`
    /// or a conflict-resolver rebuild produces a fresh builder.
    pub fn set(&mut self, state: MutableStateBuilder) {
        *self.guard = Some(state);
    }

    pub fn clear(&mut self) {
        *self.guard = None;
    }

    /// Commit the builder's pending events (§4.1 `UpdateAsActive`/
    /// `UpdateAsPassive`, parameterized on policy rather than split into two
    /// methods since the two only differ in the policy they pass through to
    /// [`MutableStateBuilder::close_transaction_as_snapshot`]). Storage
    /// writes are the caller's responsibility; this only closes the
    /// in-memory transaction.
    pub fn close_transaction(&mut self, now_ms: u64, policy: TransactionPolicy) -> (WorkflowSnapshot, Vec<HistoryEvent>) {
        // Every call site loads or sets the guard's state before closing a transaction on it.
        #[allow(clippy::expect_used)]
        let state = self.guard.as_mut().expect("state must be loaded or set before closing a transaction");
        state.close_transaction_as_snapshot(now_ms, policy)
    }

    /// `ctx.Load()` (§4.1): loads from persistence if not already cached.
    pub async fn load(&mut self, execution_store: &dyn ExecutionStore, workflow_id: &history_core::identity::WorkflowId) -> Result<&mut MutableStateBuilder, StorageError> {
        if self.guard.is_none() {
            let snapshot = execution_store.get_workflow_execution(self.key.namespace_id, workflow_id, self.key.run_id).await?;
            *self.guard = Some(MutableStateBuilder::from_snapshot(snapshot));
        }
        // The branch above populates `self.guard` whenever it was `None`.
        #[allow(clippy::expect_used)]
        let state = self.guard.as_mut().expect("just populated above");
        Ok(state)
    }
}

/// Bounded, sharded mapping `(namespace_id, workflow_id, run_id) -> ExecutionContext`
/// (§4.1). Sharding spreads lock contention across runs; eviction only ever
/// removes entries nobody currently holds, never a locked one.
pub struct ExecutionCache {
    shards: Vec<SyncMutex<HashMap<ExecutionKey, Arc<ExecutionContext>>>>,
    capacity_per_shard: usize,
}

impl ExecutionCache {
    pub fn new(num_shards: usize, capacity_per_shard: usize) -> Self {
        let num_shards = num_shards.max(1);
        Self { shards: (0..num_shards).map(|_| SyncMutex::new(HashMap::new())).collect(), capacity_per_shard }
    }

    fn shard_index(&self, key: &ExecutionKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// `GetOrCreate(nsID, wfID, runID)` (§4.1): insert-if-absent, idempotent.
    pub fn get_or_create(&self, key: ExecutionKey) -> Arc<ExecutionContext> {
        let idx = self.shard_index(&key);
        let mut shard = self.shards[idx].lock();
        if let Some(existing) = shard.get(&key) {
            return Arc::clone(existing);
        }
        if shard.len() >= self.capacity_per_shard {
            evict_one(&mut shard);
        }
        let ctx = Arc::new(ExecutionContext::new(key.clone()));
        shard.insert(key, Arc::clone(&ctx));
        ctx
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_one(shard: &mut HashMap<ExecutionKey, Arc<ExecutionContext>>) {
    let victim = shard.iter().find_map(|(key, ctx)| ctx.try_lock().map(|_guard| key.clone()));
    if let Some(key) = victim {
        shard.remove(&key);
    }
    // If every entry is currently locked, the shard is allowed to exceed
    // capacity momentarily rather than evict live state out from under a holder.
}

/// Acquire locks on two distinct runs of the same workflow in
/// runID-lexicographic order (§4.1, §5), eliminating the deadlock a
/// fixed-argument-order acquisition would risk under concurrent requests.
pub async fn lock_two(a: &Arc<ExecutionContext>, b: &Arc<ExecutionContext>, cancel: &CancellationToken) -> Result<(ExecutionGuard, ExecutionGuard), ReplicatorError> {
    debug_assert_ne!(a.key.run_id, b.key.run_id, "lock_two is for two distinct runs; lock a single context directly for the same-run case");
    if a.key.run_id.lock_order_key() <= b.key.run_id.lock_order_key() {
        let ga = a.lock(cancel).await?;
        let gb = b.lock(cancel).await?;
        Ok((ga, gb))
    } else {
        let gb = b.lock(cancel).await?;
        let ga = a.lock(cancel).await?;
        Ok((ga, gb))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
