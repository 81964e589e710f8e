// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-shard persisted state, replication message pagination, and the DLQ
//! surface (§6), including `SyncShardStatus` and the DLQ read/purge/merge
//! operations.

use crate::error::StorageResult;
use async_trait::async_trait;
use history_core::events::HistoryEvent;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use std::collections::HashMap;

/// A shard's durable bookkeeping row (§6). `range_id` fences stale shard
/// owners the way `update_condition` fences stale run writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShardInfo {
    pub shard_id: u32,
    pub range_id: i64,
    pub transfer_ack_level: i64,
    pub timer_ack_level: i64,
    pub replication_ack_level: i64,
    /// Highest replication-task ID each peer cluster has acked receiving
    /// from this shard. Bumped by `SyncShardStatus`.
    pub cluster_transfer_ack_level: HashMap<String, i64>,
}

/// One queued replication task, the unit `GetReplicationMessages` hands
/// back to a requesting peer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplicationTask {
    pub task_id: i64,
    pub namespace_id: NamespaceId,
    pub workflow_id: WorkflowId,
    pub run_id: RunId,
    pub event: HistoryEvent,
}

/// A replication task that could not be applied and was set aside for
/// operator inspection (the dead-letter queue).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DlqMessage {
    pub source_cluster: String,
    pub task: ReplicationTask,
    pub reason: String,
}

/// Opaque continuation token. Callers must treat this as uninterpreted;
/// concretely it is a shard-local sequence cursor, but that's an
/// implementation detail of the in-memory store, not a wire contract.
pub type PageToken = u64;

pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<PageToken>,
}

#[async_trait]
pub trait ShardStore: Send + Sync {
    async fn get_shard(&self, shard_id: u32) -> StorageResult<ShardInfo>;

    /// Conditional update fenced on `expected_range_id` matching what's on
    /// file, mirroring the run-level `update_condition` fence.
    async fn update_shard(&self, shard_id: u32, expected_range_id: i64, updated: ShardInfo) -> StorageResult<()>;

    /// Bump `cluster`'s acked transfer level for `shard_id` (`SyncShardStatus`).
    async fn sync_shard_status(&self, shard_id: u32, cluster: &str, ack_level: i64) -> StorageResult<()>;

    async fn enqueue_replication_task(&self, shard_id: u32, task: ReplicationTask) -> StorageResult<()>;

    async fn get_replication_messages(
        &self,
        shard_id: u32,
        last_read_task_id: i64,
        max_count: usize,
    ) -> StorageResult<Page<ReplicationTask>>;

    async fn move_to_dlq(&self, shard_id: u32, message: DlqMessage) -> StorageResult<()>;

    async fn get_dlq_messages(&self, shard_id: u32, page_token: Option<PageToken>, max_count: usize) -> StorageResult<Page<DlqMessage>>;

    /// Discard all DLQ messages up to and including `inclusive_task_id`.
    async fn purge_dlq_messages(&self, shard_id: u32, inclusive_task_id: i64) -> StorageResult<()>;

    /// Re-enqueue the named DLQ messages as ordinary replication tasks.
    async fn merge_dlq_messages(&self, shard_id: u32, task_ids: &[i64]) -> StorageResult<Page<DlqMessage>>;
}
