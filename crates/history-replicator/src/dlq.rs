// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing a replication task that failed processing to the shard's
//! dead-letter queue (SUPPLEMENTED FEATURES: DLQ surface).

use crate::resources::Resources;
use history_core::clock::Clock;
use history_core::ReplicatorError;
use history_storage::shard_store::{DlqMessage, ReplicationTask};

pub async fn route_to_dlq<C: Clock>(resources: &Resources<C>, shard_id: u32, source_cluster: String, task: ReplicationTask, reason: String) -> Result<(), ReplicatorError> {
    tracing::warn!(
        namespace_id = %task.namespace_id,
        workflow_id = %task.workflow_id,
        run_id = %task.run_id,
        reason = %reason,
        "routing replication task to dead-letter queue"
    );
    resources.shard_store.move_to_dlq(shard_id, DlqMessage { source_cluster, task, reason }).await.map_err(map_shard_error)
}

fn map_shard_error(err: history_storage::StorageError) -> ReplicatorError {
    use history_storage::StorageError;
    match err {
        StorageError::ShardOwnershipLost { .. } => ReplicatorError::ShardOwnershipLost,
        StorageError::ConditionFailed { .. } => ReplicatorError::ConditionFailed,
        other => ReplicatorError::Internal(other.to_string()),
    }
}

#[cfg(test)]
#[path = "dlq_tests.rs"]
mod tests;
