// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence-layer error taxonomy.

use history_core::identity::{NamespaceId, RunId, WorkflowId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("workflow execution not found: namespace {namespace_id} workflow {workflow_id}")]
    NotFound { namespace_id: NamespaceId, workflow_id: WorkflowId },

    /// Raised by `CreateWorkflowExecution` when a current run already
    /// exists for the workflow ID (§4.4's central decision input).
    #[error("workflow already started: namespace {namespace_id} workflow {workflow_id} current run {current_run_id}")]
    AlreadyStarted {
        namespace_id: NamespaceId,
        workflow_id: WorkflowId,
        current_run_id: RunId,
        current_state: history_core::ExecutionState,
        current_last_write_version: i64,
        current_next_event_id: i64,
        current_last_event_task_id: i64,
    },

    #[error("shard ownership lost for shard {shard_id}")]
    ShardOwnershipLost { shard_id: u32 },

    #[error("condition failed: expected update_condition {expected}, found {actual}")]
    ConditionFailed { expected: i64, actual: i64 },

    #[error("history branch not found")]
    BranchNotFound,

    #[error("storage internal error: {0}")]
    Internal(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
