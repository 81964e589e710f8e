// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The version-checking path (§4.6): decides, for a run whose mutable state
//! is already loaded, whether an incoming batch of replicated events is
//! stale, current, or ahead of what this cluster has recorded — and when
//! ahead, runs the conflict-detection protocol against the sender's claimed
//! view of our history.

use crate::cache::ExecutionGuard;
use crate::conflict_resolver::rebuild_mutable_state;
use crate::error::map_storage_error;
use crate::resources::Resources;
use crate::signal_reapply::{reapply_signals, reapply_signals_onto_guard};
use history_core::clock::Clock;
use history_core::events::{DecisionTaskFailedCause, HistoryEvent, HistoryEventAttributes};
use history_core::identity::{NamespaceId, WorkflowId};
use history_core::mutable_state::TransactionPolicy;
use history_core::replication_state::ReplicationInfo;
use history_core::{FailoverVersion, ReplicatorError};
use tokio_util::sync::CancellationToken;

/// What the request claims about the run it is replicating into.
pub struct IncomingVersionContext<'a> {
    pub version: FailoverVersion,
    pub history: &'a [HistoryEvent],
    pub replication_info: std::collections::HashMap<String, ReplicationInfo>,
    pub source_cluster: String,
}

/// Whether the caller should proceed to append `incoming` on top of the
/// (possibly just-rebuilt) state now held by `guard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheckOutcome {
    Proceed,
    Stop,
}

fn is_signal(event: &HistoryEvent) -> bool {
    matches!(event.attributes, HistoryEventAttributes::WorkflowExecutionSignaled { .. })
}

pub async fn check_version<C: Clock>(
    resources: &Resources<C>,
    cancel: &CancellationToken,
    guard: &mut ExecutionGuard,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    shard_id: u32,
    incoming: &IncomingVersionContext<'_>,
) -> Result<VersionCheckOutcome, ReplicatorError> {
    // Caller (replicator.rs's ingest dispatch) always loads the guard before reaching this path.
    #[allow(clippy::expect_used)]
    let state = guard.get().expect("version-checking requires an already-loaded run");
    let replication_state = state.replication_state().clone();
    let current_version = replication_state.last_write_version;
    let is_running = state.is_workflow_execution_running();
    let has_buffered_events = state.has_buffered_events();
    let branch_token = state.get_current_branch_token().to_vec();
    let update_condition = state.get_update_condition();

    if incoming.version < current_version {
        let current_execution = resources.execution_store.get_current_execution(namespace_id, workflow_id).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
        let is_current_run = current_execution.run_id == guard.key.run_id;
        if !is_running || !is_current_run {
            // current_execution.run_id may or may not be the run guard already
            // holds; reuse the held lock rather than re-acquiring it (the
            // per-run mutex isn't reentrant) when it is the same run.
            if is_current_run {
                reapply_signals_onto_guard(resources, namespace_id, workflow_id, shard_id, guard, incoming.history).await?;
            } else {
                reapply_signals(resources, cancel, namespace_id, workflow_id, current_execution.run_id, shard_id, incoming.history).await?;
            }
            return Ok(VersionCheckOutcome::Stop);
        }
        if !incoming.history.iter().any(is_signal) {
            return Ok(VersionCheckOutcome::Stop);
        }
        // Target is always guard.key.run_id here (is_current_run && is_running):
        // reuse the held lock, never re-acquire it.
        reapply_signals_onto_guard(resources, namespace_id, workflow_id, shard_id, guard, incoming.history).await?;
        return Ok(VersionCheckOutcome::Stop);
    }

    if incoming.version == current_version {
        return Ok(VersionCheckOutcome::Proceed);
    }

    // incoming.version > current_version: conflict-detection protocol.
    let prev_active_cluster = resources.cluster_metadata.cluster_name_for_failover_version(current_version);
    let we_were_active = match &prev_active_cluster {
        Some(cluster) => cluster == resources.cluster_metadata.current_cluster_name(),
        None => true,
    };

    if !we_were_active {
        return if resources.cluster_metadata.is_version_from_same_cluster(incoming.version, current_version) {
            Ok(VersionCheckOutcome::Proceed)
        } else {
            Err(ReplicatorError::MoreThan2DC { namespace_id, workflow_id: workflow_id.clone() })
        };
    }

    let run_id = guard.key.run_id;
    match replication_state.replication_info_for(resources.cluster_metadata.current_cluster_name()) {
        None => {
            let cut = replication_state.replication_info_for(&incoming.source_cluster).map(|i| i.last_event_id).unwrap_or(0);
            let rebuilt = rebuild_mutable_state(resources, namespace_id, workflow_id, run_id, &branch_token, current_version, cut, update_condition).await?;
            guard.set(rebuilt);
            Ok(VersionCheckOutcome::Proceed)
        }
        Some(info) if info.version > current_version => Err(ReplicatorError::ImpossibleRemoteClaimSeenHigherVersion { namespace_id, workflow_id: workflow_id.clone(), run_id }),
        Some(info) if info.version < current_version => {
            let cut = replication_state.replication_info_for(&incoming.source_cluster).map(|i| i.last_event_id).unwrap_or(0);
            let rebuilt = rebuild_mutable_state(resources, namespace_id, workflow_id, run_id, &branch_token, current_version, cut, update_condition).await?;
            guard.set(rebuilt);
            Ok(VersionCheckOutcome::Proceed)
        }
        Some(info) if info.version == current_version && info.last_event_id > replication_state.last_write_event_id => {
            Err(ReplicatorError::CorruptedReplicationInfo { namespace_id, workflow_id: workflow_id.clone(), run_id })
        }
        Some(info) if info.version == current_version && info.last_event_id == replication_state.last_write_event_id => {
            if has_buffered_events {
                flush_buffered_and_reset_decision(resources, namespace_id, workflow_id, shard_id, guard).await?;
                // flush_buffered_and_reset_decision closes and re-sets the guard's state; it never leaves it empty.
                #[allow(clippy::expect_used)]
                let post_flush_update_condition = guard.get().expect("flush leaves state loaded").get_update_condition();
                let rebuilt = rebuild_mutable_state(resources, namespace_id, workflow_id, run_id, &branch_token, current_version, info.last_event_id, post_flush_update_condition).await?;
                guard.set(rebuilt);
            }
            Ok(VersionCheckOutcome::Proceed)
        }
        Some(info) => {
            // equal versions, info.last_event_id < our last_write_event_id: peer is behind our extra events.
            let rebuilt = rebuild_mutable_state(resources, namespace_id, workflow_id, run_id, &branch_token, current_version, info.last_event_id, update_condition).await?;
            guard.set(rebuilt);
            Ok(VersionCheckOutcome::Proceed)
        }
    }
}

/// Fail the in-flight decision (so peers observe the failover boundary) and
/// schedule its replacement, committing as active before the caller rebuilds
/// state at an earlier cut point.
async fn flush_buffered_and_reset_decision<C: Clock>(
    resources: &Resources<C>,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    shard_id: u32,
    guard: &mut ExecutionGuard,
) -> Result<(), ReplicatorError> {
    let now_ms = resources.clock.epoch_ms();
    {
        // check_version only calls this helper while holding a guard it already loaded.
        #[allow(clippy::expect_used)]
        let state = guard.get_mut().expect("loaded for version-checking");
        let task_id = state.get_next_event_id();
        state.add_decision_task_failed_event(DecisionTaskFailedCause::FailoverCloseDecision, task_id, now_ms);
        let task_id = state.get_next_event_id();
        state.add_decision_task_scheduled_event("default", false, task_id, now_ms);
    }
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
#[path = "version_checking_tests.rs"]
mod tests;
