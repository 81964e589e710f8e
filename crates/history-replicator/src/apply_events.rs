// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying a batch of already-version-checked events onto a run's loaded
//! state (§4.7): duplicate/gap detection against `next_event_id`, then a
//! single passive commit.

use crate::error::map_storage_error;
use crate::resources::Resources;
use history_core::clock::Clock;
use history_core::identity::{NamespaceId, WorkflowId};
use history_core::mutable_state::TransactionPolicy;
use history_core::{HistoryEvent, ReplicatorError};
use crate::cache::ExecutionGuard;

#[allow(clippy::too_many_arguments)]
pub async fn apply_other_events<C: Clock>(
    resources: &Resources<C>,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    shard_id: u32,
    guard: &mut ExecutionGuard,
    first_event_id: i64,
    next_event_id: i64,
    events: &[HistoryEvent],
    force_buffer_events: bool,
) -> Result<(), ReplicatorError> {
    // replicator.rs's ingest dispatch loads the guard before calling into this path.
    #[allow(clippy::expect_used)]
    let state = guard.get().expect("apply_other_events requires an already-loaded run");
    let local_next = state.get_next_event_id();
    let is_closed = state.execution_info().state.is_closed();

    if first_event_id < local_next {
        tracing::info!(namespace_id = %namespace_id, workflow_id = %workflow_id, "dropping duplicate event batch");
        return Ok(());
    }

    if first_event_id > local_next {
        if is_closed && !force_buffer_events {
            tracing::info!(namespace_id = %namespace_id, workflow_id = %workflow_id, "dropping out-of-order batch against a closed run");
            return Ok(());
        }
        return Err(ReplicatorError::RetryBufferEvents { namespace_id, workflow_id: workflow_id.clone(), run_id: guard.key.run_id, next_event_id: local_next });
    }

    // Same guard checked loaded just above; nothing in between can clear it.
    #[allow(clippy::expect_used)]
    let state = guard.get_mut().expect("checked above");
    history_core::apply_events(state, events).map_err(|e| ReplicatorError::Internal(e.to_string()))?;
    debug_assert_eq!(state.get_next_event_id(), next_event_id, "request's nextEventID must match what applying its events produces");

    let (snapshot, _) = guard.close_transaction(resources.clock.epoch_ms(), TransactionPolicy::Passive);
    resources
        .history_store
        .append_history_nodes(&snapshot.execution_info.branch_token, shard_id, events)
        .await
        .map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
    resources.execution_store.update_workflow_execution(workflow_id, snapshot).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))
}

#[cfg(test)]
#[path = "apply_events_tests.rs"]
mod tests;
