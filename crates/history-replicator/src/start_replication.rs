// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start-event replication (§4.4): the decision table `replicateWorkflowStarted`
//! consults when `CreateWorkflowExecution(BrandNew)` reports that a current
//! run already exists.

use crate::error::map_storage_error;
use crate::resources::Resources;
use crate::signal_reapply::{reapply_signals, terminate_current_run};
use history_core::clock::Clock;
use history_core::execution_info::{ExecutionInfo, ExecutionState};
use history_core::identity::{ExecutionKey, NamespaceId, RunId, WorkflowId};
use history_core::mutable_state::{MutableStateBuilder, TransactionPolicy, WorkflowSnapshot};
use history_core::replication_state::ReplicationState;
use history_core::version_history::{VersionHistories, VersionHistory};
use history_core::{FailoverVersion, HistoryEvent, ReplicatorError};
use history_storage::execution_store::CreateMode;
use history_storage::StorageError;
use tokio_util::sync::CancellationToken;

/// Inputs to a single `replicateWorkflowStarted` call.
pub struct StartReplicationInput {
    pub namespace_id: NamespaceId,
    pub workflow_id: WorkflowId,
    pub run_id: RunId,
    pub shard_id: u32,
    pub history: Vec<HistoryEvent>,
}

/// A fresh builder seeded from scratch for a run this process is about to
/// populate from replicated history (§4.4, §4.9). The branch token is
/// derived from the run ID rather than allocated by a history-node store
/// (out of scope, §1) — deterministic and unique per run, which is all the
/// Persistence Capability contract requires of it.
pub(crate) fn fresh_builder(namespace_id: NamespaceId, run_id: RunId, branch_token: Vec<u8>, start_version: FailoverVersion) -> MutableStateBuilder {
    let execution_info = ExecutionInfo::new(run_id, branch_token, format!("replicated-{run_id}"));
    let replication_state = ReplicationState::new(start_version);
    let version_histories = VersionHistories::new(VersionHistory::new());
    MutableStateBuilder::new(namespace_id, execution_info, replication_state, version_histories)
}

pub(crate) fn branch_token_for(run_id: RunId) -> Vec<u8> {
    run_id.0.as_bytes().to_vec()
}

pub async fn replicate_workflow_started<C: Clock>(resources: &Resources<C>, cancel: &CancellationToken, input: StartReplicationInput) -> Result<(), ReplicatorError> {
    let incoming_version = input.history.first().map(|e| e.version).unwrap_or(0);
    let incoming_task_id = input.history.first().map(|e| e.task_id).unwrap_or(0);
    let branch_token = branch_token_for(input.run_id);

    let key = ExecutionKey::new(input.namespace_id, input.workflow_id.clone(), input.run_id);
    let ctx = resources.execution_cache.get_or_create(key);
    let mut guard = ctx.lock(cancel).await?;

    let mut builder = fresh_builder(input.namespace_id, input.run_id, branch_token.clone(), incoming_version);
    history_core::apply_events(&mut builder, &input.history).map_err(|e| ReplicatorError::Internal(e.to_string()))?;
    guard.set(builder);

    resources
        .history_store
        .append_history_nodes(&branch_token, input.shard_id, &input.history)
        .await
        .map_err(|e| map_storage_error(e, input.namespace_id, &input.workflow_id))?;

    let (snapshot, _) = guard.close_transaction(resources.clock.epoch_ms(), TransactionPolicy::Passive);
    drop(guard);

    match resources.execution_store.create_workflow_execution(&input.workflow_id, CreateMode::BrandNew, snapshot.clone()).await {
        Ok(()) => {
            tracing::info!(
                namespace_id = %input.namespace_id,
                workflow_id = %input.workflow_id,
                run_id = %input.run_id,
                "brand-new run created from replicated start event"
            );
            Ok(())
        }
        Err(StorageError::AlreadyStarted {
            current_run_id,
            current_state,
            current_last_write_version,
            current_next_event_id,
            current_last_event_task_id,
            ..
        }) => {
            handle_already_started(
                resources,
                cancel,
                &input,
                incoming_version,
                incoming_task_id,
                &branch_token,
                snapshot,
                current_run_id,
                current_state,
                current_last_write_version,
                current_next_event_id,
                current_last_event_task_id,
            )
            .await
        }
        Err(other) => Err(map_storage_error(other, input.namespace_id, &input.workflow_id)),
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_already_started<C: Clock>(
    resources: &Resources<C>,
    cancel: &CancellationToken,
    input: &StartReplicationInput,
    incoming_version: FailoverVersion,
    incoming_task_id: i64,
    branch_token: &[u8],
    snapshot: WorkflowSnapshot,
    current_run_id: RunId,
    current_state: ExecutionState,
    current_last_write_version: FailoverVersion,
    current_next_event_id: i64,
    current_last_event_task_id: i64,
) -> Result<(), ReplicatorError> {
    if current_run_id == input.run_id {
        tracing::info!(
            namespace_id = %input.namespace_id,
            workflow_id = %input.workflow_id,
            run_id = %input.run_id,
            "idempotent retry of an already-created run"
        );
        return Ok(());
    }

    if current_state.is_closed() {
        if incoming_version >= current_last_write_version {
            return retry_as_workflow_id_reuse(resources, &input.workflow_id, input.namespace_id, snapshot, current_run_id, current_last_write_version).await;
        }
        reject_and_cleanup(resources, input, branch_token).await?;
        return Ok(());
    }

    // current_state is Created or Running: an open run.
    if incoming_version < current_last_write_version {
        reject_and_cleanup(resources, input, branch_token).await?;
        reapply_signals(resources, cancel, input.namespace_id, &input.workflow_id, current_run_id, input.shard_id, &input.history).await?;
        return Ok(());
    }

    if incoming_version == current_last_write_version {
        if incoming_task_id <= current_last_event_task_id {
            tracing::warn!(
                namespace_id = %input.namespace_id,
                workflow_id = %input.workflow_id,
                "dropping out-of-order duplicate start-event replication"
            );
            return Ok(());
        }
        return Err(ReplicatorError::RetryExistingWorkflow {
            namespace_id: input.namespace_id,
            workflow_id: input.workflow_id.clone(),
            run_id: current_run_id,
            next_event_id: current_next_event_id,
        });
    }

    terminate_current_run(resources, cancel, input.namespace_id, &input.workflow_id, current_run_id, input.shard_id).await?;
    retry_as_workflow_id_reuse(resources, &input.workflow_id, input.namespace_id, snapshot, current_run_id, current_last_write_version).await
}

async fn retry_as_workflow_id_reuse<C: Clock>(
    resources: &Resources<C>,
    workflow_id: &WorkflowId,
    namespace_id: NamespaceId,
    snapshot: WorkflowSnapshot,
    previous_run_id: RunId,
    previous_last_write_version: FailoverVersion,
) -> Result<(), ReplicatorError> {
    resources
        .execution_store
        .create_workflow_execution(workflow_id, CreateMode::WorkflowIdReuse { previous_run_id, previous_last_write_version }, snapshot)
        .await
        .map_err(|e| map_storage_error(e, namespace_id, workflow_id))
}

async fn reject_and_cleanup<C: Clock>(resources: &Resources<C>, input: &StartReplicationInput, branch_token: &[u8]) -> Result<(), ReplicatorError> {
    resources
        .history_store
        .delete_history_branch(&branch_token.to_vec(), input.shard_id)
        .await
        .map_err(|e| map_storage_error(e, input.namespace_id, &input.workflow_id))?;
    tracing::warn!(
        namespace_id = %input.namespace_id,
        workflow_id = %input.workflow_id,
        run_id = %input.run_id,
        "rejected stale start-event replication; branch deleted"
    );
    Ok(())
}

#[cfg(test)]
#[path = "start_replication_tests.rs"]
mod tests;
