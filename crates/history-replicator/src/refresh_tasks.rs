// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RefreshWorkflowTasks` (SUPPLEMENTED FEATURES): re-derive the transfer/
//! timer/replication tasks a run's persisted history would generate,
//! without touching history or mutable state. Useful after a
//! conflict-resolver reset (§4.9) leaves the real task queues (out of
//! scope here) stale.

use crate::error::map_storage_error;
use crate::resources::Resources;
use crate::start_replication::fresh_builder;
use history_core::clock::Clock;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::{GeneratedTask, ReplicatorError};

pub async fn refresh_workflow_tasks<C: Clock>(resources: &Resources<C>, namespace_id: NamespaceId, workflow_id: &WorkflowId, run_id: RunId) -> Result<Vec<GeneratedTask>, ReplicatorError> {
    let snapshot = resources
        .execution_store
        .get_workflow_execution(namespace_id, workflow_id, run_id)
        .await
        .map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;

    let branch_token = snapshot.execution_info.branch_token.clone();
    let up_to = snapshot.execution_info.next_event_id - 1;
    let history = resources.history_store.read_history(&branch_token, up_to).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;

    let mut builder = fresh_builder(namespace_id, run_id, branch_token, snapshot.replication_state.start_version);
    history_core::apply_events(&mut builder, &history).map_err(|e| ReplicatorError::Internal(e.to_string()))
}

#[cfg(test)]
#[path = "refresh_tasks_tests.rs"]
mod tests;
