// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Persistence Capability's execution-row operations (§2, §6).

use crate::error::StorageResult;
use async_trait::async_trait;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::mutable_state::WorkflowSnapshot;

/// How a new run's row should be written relative to whatever the
/// `workflow_id`'s current run pointer is (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// No current run exists yet for this workflow ID.
    BrandNew,
    /// A current run exists but is closed (or being atomically replaced);
    /// reuse the workflow ID, pointing the current-run marker at the new
    /// run.
    WorkflowIdReuse { previous_run_id: RunId, previous_last_write_version: i64 },
}

/// Which run is "current" for a `(namespace_id, workflow_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentExecutionRecord {
    pub run_id: RunId,
    pub state: history_core::ExecutionState,
    pub last_write_version: i64,
    pub next_event_id: i64,
    pub last_event_task_id: i64,
}

/// The execution-row half of the Persistence Capability (§2). Implementors
/// must enforce invariant 5 (at most one run in `{Created, Running}` per
/// workflow) by rejecting `CreateWorkflowExecution(BrandNew)` with
/// `StorageError::AlreadyStarted` whenever a current run already exists.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    async fn get_current_execution(
        &self,
        namespace_id: NamespaceId,
        workflow_id: &WorkflowId,
    ) -> StorageResult<CurrentExecutionRecord>;

    async fn get_workflow_execution(
        &self,
        namespace_id: NamespaceId,
        workflow_id: &WorkflowId,
        run_id: RunId,
    ) -> StorageResult<WorkflowSnapshot>;

    /// `WorkflowSnapshot` carries no `workflow_id` of its own (only the
    /// namespace and run identify a snapshot); the caller supplies it here
    /// since it is the caller who is minting (or reusing) the workflow ID
    /// for this run.
    async fn create_workflow_execution(&self, workflow_id: &WorkflowId, mode: CreateMode, snapshot: WorkflowSnapshot) -> StorageResult<()>;

    /// Commit an update to an existing run, enforced conditional on
    /// `snapshot.update_condition` matching what this store currently has on
    /// file (invariant 6 / optimistic concurrency, §5).
    async fn update_workflow_execution(&self, workflow_id: &WorkflowId, snapshot: WorkflowSnapshot) -> StorageResult<()>;
}

