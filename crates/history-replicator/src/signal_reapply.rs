// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal reapplication (§4.8) and the terminate-current-run step shared by
//! the start-event (§4.4) and missing-mutable-state (§4.5) decision tables.
//! Both commit as active: the current cluster takes authorship of the
//! target run even though it is acting on behalf of events authored
//! remotely.

use crate::cache::ExecutionGuard;
use crate::error::map_storage_error;
use crate::resources::Resources;
use history_core::clock::Clock;
use history_core::identity::{ExecutionKey, NamespaceId, RunId, WorkflowId};
use history_core::mutable_state::TransactionPolicy;
use history_core::{HistoryEvent, HistoryEventAttributes, ReplicatorError};
use tokio_util::sync::CancellationToken;

/// Extract and reapply every `WorkflowExecutionSignaled` event in
/// `source_events` onto `target_run_id` as a single active transaction. A
/// no-op if `source_events` carries no signals.
///
/// Locks `target_run_id`'s context itself — callers must not already be
/// holding that same run's lock (the per-run mutex isn't reentrant; see
/// [`reapply_signals_onto_guard`] for the case where the caller's own
/// already-locked run is the target).
pub async fn reapply_signals<C: Clock>(
    resources: &Resources<C>,
    cancel: &CancellationToken,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    target_run_id: RunId,
    shard_id: u32,
    source_events: &[HistoryEvent],
) -> Result<(), ReplicatorError> {
    let key = ExecutionKey::new(namespace_id, workflow_id.clone(), target_run_id);
    let ctx = resources.execution_cache.get_or_create(key);
    let mut guard = ctx.lock(cancel).await?;
    guard.load(resources.execution_store.as_ref(), workflow_id).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
    reapply_signals_onto_guard(resources, namespace_id, workflow_id, shard_id, &mut guard, source_events).await
}

/// Same as [`reapply_signals`], but onto a run whose lock the caller is
/// already holding (§4.1: "locks on two runs of the same workflow are
/// always acquired in runID lexicographic order" — when the reapply target
/// *is* the run already locked, there is only one run involved and no new
/// lock to order against).
pub async fn reapply_signals_onto_guard<C: Clock>(
    resources: &Resources<C>,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    shard_id: u32,
    guard: &mut ExecutionGuard,
    source_events: &[HistoryEvent],
) -> Result<(), ReplicatorError> {
    let signals: Vec<&HistoryEvent> = source_events.iter().filter(|e| matches!(e.attributes, HistoryEventAttributes::WorkflowExecutionSignaled { .. })).collect();
    if signals.is_empty() {
        return Ok(());
    }

    let target_run_id = guard.key.run_id;
    let now_ms = resources.clock.epoch_ms();
    for event in signals {
        // `signals` was filtered to WorkflowExecutionSignaled attributes above.
        #[allow(clippy::unreachable)]
        let (signal_name, input, identity) = match &event.attributes {
            HistoryEventAttributes::WorkflowExecutionSignaled { signal_name, input, identity } => (signal_name.clone(), input.clone(), identity.clone()),
            _ => unreachable!("filtered to signal events above"),
        };
        // Both call sites (`reapply_signals`, `reapply_signals_onto_guard`'s
        // direct callers in version_checking.rs) load the guard beforehand.
        #[allow(clippy::expect_used)]
        let state = guard.get_mut().expect("caller loaded the run before handing over its guard");
        let target_version = state.get_last_write_version();
        state.update_current_version(target_version, true);
        let task_id = state.get_next_event_id();
        state.add_workflow_execution_signaled(signal_name, input, identity, task_id, now_ms);
        if !state.has_pending_decision() {
            let task_id = state.get_next_event_id();
            state.add_decision_task_scheduled_event("default", false, task_id, now_ms);
        }
    }
    tracing::info!(namespace_id = %namespace_id, workflow_id = %workflow_id, run_id = %target_run_id, "reapplied signal events onto target run");

    let (snapshot, events) = guard.close_transaction(now_ms, TransactionPolicy::Active);
    if !events.is_empty() {
        resources
            .history_store
            .append_history_nodes(&snapshot.execution_info.branch_token, shard_id, &events)
            .await
            .map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
    }
    resources.execution_store.update_workflow_execution(workflow_id, snapshot).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))
}

/// Terminate the current run as a precursor to superseding it (§4.4, §4.5):
/// `AddWorkflowExecutionTerminatedEvent` with the fixed reason the decision
/// table names, committed as active.
pub async fn terminate_current_run<C: Clock>(
    resources: &Resources<C>,
    cancel: &CancellationToken,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    run_id: RunId,
    shard_id: u32,
) -> Result<(), ReplicatorError> {
    let key = ExecutionKey::new(namespace_id, workflow_id.clone(), run_id);
    let ctx = resources.execution_cache.get_or_create(key);
    let mut guard = ctx.lock(cancel).await?;
    guard.load(resources.execution_store.as_ref(), workflow_id).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;

    let now_ms = resources.clock.epoch_ms();
    {
        // Loaded by `guard.load` immediately above.
        #[allow(clippy::expect_used)]
        let state = guard.get_mut().expect("loaded above");
        let task_id = state.get_next_event_id();
        state.add_workflow_execution_terminated_event("history replicator terminating workflow", Vec::new(), "history-service", task_id, now_ms);
    }
    tracing::warn!(namespace_id = %namespace_id, workflow_id = %workflow_id, run_id = %run_id, "terminated current run to make way for a higher-version replicated start");

    let (snapshot, events) = guard.close_transaction(now_ms, TransactionPolicy::Active);
    if !events.is_empty() {
        resources
            .history_store
            .append_history_nodes(&snapshot.execution_info.branch_token, shard_id, &events)
            .await
            .map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
    }
    resources.execution_store.update_workflow_execution(workflow_id, snapshot).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))
}

#[cfg(test)]
#[path = "signal_reapply_tests.rs"]
mod tests;
