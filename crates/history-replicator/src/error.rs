// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps the Persistence Capability's error taxonomy onto the replicator's
//! own (§7). `StorageError::NotFound` and `StorageError::AlreadyStarted`
//! are not errors at this boundary — the decision tables in
//! `start_replication` and `missing_mutable_state` consume them directly —
//! so this function is only reached for the remainder.

use history_core::identity::{NamespaceId, WorkflowId};
use history_core::ReplicatorError;
use history_storage::StorageError;

pub fn map_storage_error(err: StorageError, namespace_id: NamespaceId, workflow_id: &WorkflowId) -> ReplicatorError {
    match err {
        StorageError::ShardOwnershipLost { .. } => ReplicatorError::ShardOwnershipLost,
        StorageError::ConditionFailed { .. } => ReplicatorError::ConditionFailed,
        StorageError::BranchNotFound => ReplicatorError::Internal("history branch not found".to_string()),
        StorageError::NotFound { .. } => ReplicatorError::Internal(format!("unexpected not-found for namespace {namespace_id} workflow {workflow_id}")),
        StorageError::AlreadyStarted { .. } => ReplicatorError::Internal(format!(
            "unexpected already-started for namespace {namespace_id} workflow {workflow_id}: caller must special-case this before mapping"
        )),
        StorageError::Internal(msg) => ReplicatorError::Internal(msg),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
