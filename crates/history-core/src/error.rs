// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the history replicator (§7).
//!
//! Four policy classes, distinguished so callers know what to do without
//! inspecting error strings: [`ReplicatorError::is_retriable`],
//! [`ReplicatorError::is_conflict`] and friends below.

use crate::identity::{NamespaceId, RunId, WorkflowId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplicatorError {
    // --- Retriable: caller re-sends, carrying the hinted next_event_id ---
    #[error("retry buffer events: namespace {namespace_id} workflow {workflow_id} run {run_id}, resend from {next_event_id}")]
    RetryBufferEvents { namespace_id: NamespaceId, workflow_id: WorkflowId, run_id: RunId, next_event_id: i64 },

    #[error("workflow not found: namespace {namespace_id} workflow {workflow_id}, resend from {next_event_id}")]
    RetryWorkflowNotFound { namespace_id: NamespaceId, workflow_id: WorkflowId, next_event_id: i64 },

    #[error("existing workflow running: namespace {namespace_id} workflow {workflow_id} run {run_id}, resend from {next_event_id}")]
    RetryExistingWorkflow { namespace_id: NamespaceId, workflow_id: WorkflowId, run_id: RunId, next_event_id: i64 },

    // --- Conflict: protocol violation, do not retry, escalate to DLQ ---
    #[error("more than two clusters diverged for namespace {namespace_id} workflow {workflow_id}")]
    MoreThan2DC { namespace_id: NamespaceId, workflow_id: WorkflowId },

    #[error("peer claims to have seen a higher version than this run ever wrote: namespace {namespace_id} workflow {workflow_id} run {run_id}")]
    ImpossibleRemoteClaimSeenHigherVersion { namespace_id: NamespaceId, workflow_id: WorkflowId, run_id: RunId },

    #[error("corrupted replication info for namespace {namespace_id} workflow {workflow_id} run {run_id}")]
    CorruptedReplicationInfo { namespace_id: NamespaceId, workflow_id: WorkflowId, run_id: RunId },

    // --- Transient persistence: caller surfaces, shard controller may retry ---
    #[error("shard ownership lost")]
    ShardOwnershipLost,

    #[error("condition failed: optimistic concurrency check did not match")]
    ConditionFailed,

    // --- Terminal/internal ---
    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation canceled")]
    Cancelled,
}

impl ReplicatorError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ReplicatorError::RetryBufferEvents { .. }
                | ReplicatorError::RetryWorkflowNotFound { .. }
                | ReplicatorError::RetryExistingWorkflow { .. }
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ReplicatorError::MoreThan2DC { .. }
                | ReplicatorError::ImpossibleRemoteClaimSeenHigherVersion { .. }
                | ReplicatorError::CorruptedReplicationInfo { .. }
        )
    }

    pub fn is_transient_persistence(&self) -> bool {
        matches!(self, ReplicatorError::ShardOwnershipLost | ReplicatorError::ConditionFailed)
    }
}

pub type ReplicatorResult<T> = Result<T, ReplicatorError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
