// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::identity::{NamespaceId, RunId, WorkflowId};

fn key(workflow: &str) -> ExecutionKey {
    ExecutionKey::new(NamespaceId::new(), WorkflowId::new(workflow), RunId::new())
}

#[tokio::test]
async fn get_or_create_is_idempotent_for_the_same_key() {
    let cache = ExecutionCache::new(4, 16);
    let k = key("w1");
    let a = cache.get_or_create(k.clone());
    let b = cache.get_or_create(k);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn distinct_keys_get_distinct_contexts() {
    let cache = ExecutionCache::new(4, 16);
    let a = cache.get_or_create(key("w1"));
    let b = cache.get_or_create(key("w2"));
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn lock_blocks_a_second_acquisition_until_released() {
    let ctx = Arc::new(ExecutionContext::new(key("w1")));
    let cancel = CancellationToken::new();
    let guard = ctx.lock(&cancel).await.expect("first lock succeeds");
    assert!(ctx.try_lock().is_none(), "context is already held");
    drop(guard);
    assert!(ctx.try_lock().is_some(), "lock is released once the guard drops");
}

#[tokio::test]
async fn lock_fails_with_cancelled_once_token_fires() {
    let ctx = Arc::new(ExecutionContext::new(key("w1")));
    let cancel = CancellationToken::new();
    let _holder = ctx.lock(&cancel).await.expect("first lock succeeds");
    cancel.cancel();
    let err = ctx.lock(&cancel).await.expect_err("token already cancelled");
    assert_eq!(err, history_core::ReplicatorError::Cancelled);
}

#[tokio::test]
async fn lock_two_acquires_in_runid_lexicographic_order_regardless_of_argument_order() {
    let workflow_id = WorkflowId::new("same-workflow");
    let namespace_id = NamespaceId::new();
    let run_low = RunId::from_uuid(uuid::Uuid::nil());
    let run_high = RunId::new();
    let ctx_low = Arc::new(ExecutionContext::new(ExecutionKey::new(namespace_id, workflow_id.clone(), run_low)));
    let ctx_high = Arc::new(ExecutionContext::new(ExecutionKey::new(namespace_id, workflow_id, run_high)));
    let cancel = CancellationToken::new();

    // Pass the higher-ordered run first; lock_two must still take the lower one first.
    let (g_high_arg, g_low_arg) = lock_two(&ctx_high, &ctx_low, &cancel).await.expect("no contention");
    assert_eq!(g_high_arg.key.run_id, run_high);
    assert_eq!(g_low_arg.key.run_id, run_low);
}

#[tokio::test]
async fn eviction_never_removes_a_locked_entry() {
    let cache = ExecutionCache::new(1, 1);
    let held = cache.get_or_create(key("held"));
    let cancel = CancellationToken::new();
    let _guard = held.lock(&cancel).await.expect("lock held entry");

    let _second = cache.get_or_create(key("second"));

    let still_present = {
        let shard = cache.shards[0].lock();
        shard.contains_key(&held.key)
    };
    assert!(still_present, "locked entry must survive the eviction sweep");
}

#[tokio::test]
async fn load_populates_from_store_and_is_cached_on_subsequent_access() {
    use history_core::execution_info::ExecutionInfo;
    use history_core::mutable_state::WorkflowSnapshot;
    use history_core::replication_state::ReplicationState;
    use history_core::version_history::{VersionHistories, VersionHistory};
    use history_storage::execution_store::CreateMode;
    use history_storage::memory::execution::InMemoryExecutionStore;

    let namespace_id = NamespaceId::new();
    let workflow_id = WorkflowId::new("w1");
    let run_id = RunId::new();
    let store = InMemoryExecutionStore::new();
    let snapshot = WorkflowSnapshot {
        namespace_id,
        execution_info: ExecutionInfo::new(run_id, vec![], "request-1"),
        replication_state: ReplicationState::new(1),
        version_histories: VersionHistories::new(VersionHistory::new()),
        update_condition: 0,
    };
    store.create_workflow_execution(&workflow_id, CreateMode::BrandNew, snapshot).await.expect("seed store");

    let ctx = ExecutionContext::new(ExecutionKey::new(namespace_id, workflow_id.clone(), run_id));
    let cancel = CancellationToken::new();
    let mut guard = ctx.lock(&cancel).await.expect("lock");
    assert!(!guard.is_loaded());
    guard.load(&store, &workflow_id).await.expect("load from store");
    assert!(guard.is_loaded());
    assert_eq!(guard.get().expect("loaded").get_last_write_version(), 1);
}
