// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level error taxonomy (§6 "Errors returned on the wire", §7).
//!
//! `history_core::ReplicatorError` is the typed error every internal
//! function returns; `WireError` is its serializable shape, the only place
//! a catch-all (`Internal`) is acceptable.

use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::ReplicatorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Carries the exact resend hint a caller needs (§6 `RetryTaskError`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("retry task: namespace {namespace_id} workflow {workflow_id} run {run_id:?}, resend from {next_event_id}: {message}")]
pub struct RetryTaskError {
    pub message: String,
    pub namespace_id: NamespaceId,
    pub workflow_id: WorkflowId,
    pub run_id: Option<RunId>,
    pub next_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum WireError {
    #[error(transparent)]
    RetryTask(#[from] RetryTaskError),

    #[error("more than two data centers diverged")]
    MoreThan2DC,

    #[error("peer claims to have seen a version this run never wrote")]
    ImpossibleRemoteClaimSeenHigherVersion,

    #[error("corrupted replication info")]
    CorruptedReplicationInfo,

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("shard ownership lost")]
    ShardOwnershipLost,

    #[error("condition failed")]
    ConditionFailed,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("canceled")]
    Cancelled,
}

impl From<ReplicatorError> for WireError {
    fn from(err: ReplicatorError) -> Self {
        match err {
            ReplicatorError::RetryBufferEvents { namespace_id, workflow_id, run_id, next_event_id } => {
                WireError::RetryTask(RetryTaskError {
                    message: "retry buffer events".to_string(),
                    namespace_id,
                    workflow_id,
                    run_id: Some(run_id),
                    next_event_id,
                })
            }
            ReplicatorError::RetryWorkflowNotFound { namespace_id, workflow_id, next_event_id } => {
                WireError::RetryTask(RetryTaskError {
                    message: "workflow not found".to_string(),
                    namespace_id,
                    workflow_id,
                    run_id: None,
                    next_event_id,
                })
            }
            ReplicatorError::RetryExistingWorkflow { namespace_id, workflow_id, run_id, next_event_id } => {
                WireError::RetryTask(RetryTaskError {
                    message: "existing workflow running".to_string(),
                    namespace_id,
                    workflow_id,
                    run_id: Some(run_id),
                    next_event_id,
                })
            }
            ReplicatorError::MoreThan2DC { .. } => WireError::MoreThan2DC,
            ReplicatorError::ImpossibleRemoteClaimSeenHigherVersion { .. } => WireError::ImpossibleRemoteClaimSeenHigherVersion,
            ReplicatorError::CorruptedReplicationInfo { .. } => WireError::CorruptedReplicationInfo,
            ReplicatorError::ShardOwnershipLost => WireError::ShardOwnershipLost,
            ReplicatorError::ConditionFailed => WireError::ConditionFailed,
            ReplicatorError::Cancelled => WireError::Cancelled,
            ReplicatorError::Internal(msg) => WireError::Internal(msg),
        }
    }
}

pub type WireResult<T> = Result<T, WireError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
