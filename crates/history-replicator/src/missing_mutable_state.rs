// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The missing-mutable-state path (§4.5): entered when the ingestion
//! dispatcher (§4.3) has no cached or persisted state for the target run
//! and the incoming event batch is not itself a start event.

use crate::error::map_storage_error;
use crate::resources::Resources;
use crate::signal_reapply::{reapply_signals, terminate_current_run};
use history_core::clock::Clock;
use history_core::identity::{NamespaceId, WorkflowId};
use history_core::{HistoryEvent, ReplicatorError};
use history_storage::StorageError;
use tokio_util::sync::CancellationToken;

#[allow(clippy::too_many_arguments)]
pub async fn apply_with_missing_mutable_state<C: Clock>(
    resources: &Resources<C>,
    cancel: &CancellationToken,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    shard_id: u32,
    incoming_history: &[HistoryEvent],
    reset_workflow: bool,
) -> Result<(), ReplicatorError> {
    let incoming_version = incoming_history.first().map(|e| e.version).unwrap_or(0);
    let incoming_task_id = incoming_history.first().map(|e| e.task_id).unwrap_or(0);

    let current = match resources.execution_store.get_current_execution(namespace_id, workflow_id).await {
        Ok(current) => current,
        Err(StorageError::NotFound { .. }) => {
            return Err(ReplicatorError::RetryWorkflowNotFound { namespace_id, workflow_id: workflow_id.clone(), next_event_id: 1 });
        }
        Err(other) => return Err(map_storage_error(other, namespace_id, workflow_id)),
    };

    if reset_workflow {
        // Delegating a workflow reset to the active-side mutation engine is
        // out of scope here (§1): that collaborator isn't modeled in this
        // crate, so a reset request can't be carried out.
        return Err(ReplicatorError::Internal("workflow reset delegate is not available in this deployment".to_string()));
    }

    if incoming_version < current.last_write_version {
        reapply_signals(resources, cancel, namespace_id, workflow_id, current.run_id, shard_id, incoming_history).await?;
        return Ok(());
    }

    if incoming_version == current.last_write_version {
        if !current.state.is_running() {
            // Closed current run at equal version: same retry hint as the
            // out-of-order-duplicate-on-a-running-run branch above.
            return Err(ReplicatorError::RetryWorkflowNotFound { namespace_id, workflow_id: workflow_id.clone(), next_event_id: current.next_event_id });
        }
        if incoming_task_id > current.last_event_task_id {
            return Err(ReplicatorError::RetryWorkflowNotFound { namespace_id, workflow_id: workflow_id.clone(), next_event_id: current.next_event_id });
        }
        return Ok(());
    }

    if current.state.is_running() {
        terminate_current_run(resources, cancel, namespace_id, workflow_id, current.run_id, shard_id).await?;
    }
    Err(ReplicatorError::RetryWorkflowNotFound { namespace_id, workflow_id: workflow_id.clone(), next_event_id: 1 })
}

#[cfg(test)]
#[path = "missing_mutable_state_tests.rs"]
mod tests;
