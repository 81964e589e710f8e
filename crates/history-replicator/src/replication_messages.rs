// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin wrappers over the shard store's replication-message and DLQ
//! pagination surface (§4.2, SUPPLEMENTED FEATURES), mapping storage errors
//! onto the replicator's own taxonomy.

use crate::resources::Resources;
use history_core::clock::Clock;
use history_core::ReplicatorError;
use history_storage::shard_store::{DlqMessage, Page, PageToken, ReplicationTask};
use history_storage::StorageError;

fn map_shard_error(err: StorageError) -> ReplicatorError {
    match err {
        StorageError::ShardOwnershipLost { .. } => ReplicatorError::ShardOwnershipLost,
        StorageError::ConditionFailed { .. } => ReplicatorError::ConditionFailed,
        other => ReplicatorError::Internal(other.to_string()),
    }
}

pub async fn get_replication_messages<C: Clock>(resources: &Resources<C>, shard_id: u32, last_read_task_id: i64, max_count: usize) -> Result<Page<ReplicationTask>, ReplicatorError> {
    resources.shard_store.get_replication_messages(shard_id, last_read_task_id, max_count).await.map_err(map_shard_error)
}

pub async fn read_dlq_messages<C: Clock>(resources: &Resources<C>, shard_id: u32, page_token: Option<PageToken>, max_count: usize) -> Result<Page<DlqMessage>, ReplicatorError> {
    resources.shard_store.get_dlq_messages(shard_id, page_token, max_count).await.map_err(map_shard_error)
}

pub async fn purge_dlq_messages<C: Clock>(resources: &Resources<C>, shard_id: u32, inclusive_task_id: i64) -> Result<(), ReplicatorError> {
    resources.shard_store.purge_dlq_messages(shard_id, inclusive_task_id).await.map_err(map_shard_error)
}

pub async fn merge_dlq_messages<C: Clock>(resources: &Resources<C>, shard_id: u32, task_ids: &[i64]) -> Result<Page<DlqMessage>, ReplicatorError> {
    resources.shard_store.merge_dlq_messages(shard_id, task_ids).await.map_err(map_shard_error)
}

#[cfg(test)]
#[path = "replication_messages_tests.rs"]
mod tests;
