// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level ingestion dispatcher (§4.3): the entry point every wire
//! request surface (§4.2, §6) eventually calls through. Decides which of
//! the three decision tables — start-event replication (§4.4),
//! missing-mutable-state (§4.5), or version-checking (§4.6) followed by
//! apply (§4.7) — a batch of replicated events belongs to, and folds in
//! the auxiliary request kinds (`SyncActivity`, `SyncShardStatus`,
//! `ReapplyEvents`, `RefreshWorkflowTasks`, the DLQ surface) that don't
//! need the full reconciliation machinery.

use crate::apply_events::apply_other_events;
use crate::cache::ExecutionCache;
use crate::dlq::route_to_dlq;
use crate::error::map_storage_error;
use crate::missing_mutable_state::apply_with_missing_mutable_state;
use crate::refresh_tasks::refresh_workflow_tasks as refresh_workflow_tasks_impl;
use crate::replication_messages;
use crate::resources::Resources;
use crate::signal_reapply::reapply_signals;
use crate::start_replication::{replicate_workflow_started, StartReplicationInput};
use crate::version_checking::{check_version, IncomingVersionContext, VersionCheckOutcome};
use history_core::clock::Clock;
use history_core::identity::{ExecutionKey, NamespaceId, RunId, WorkflowId};
use history_core::replication_state::ReplicationInfo;
use history_core::{GeneratedTask, HistoryEvent, HistoryEventAttributes, ReplicatorError, ReplicatorResult};
use history_storage::shard_store::{DlqMessage, Page, PageToken, ReplicationTask};
use history_storage::StorageError;
use history_wire::messages::{
    DlqTokenKind, ReapplyEventsRequest, RefreshWorkflowTasksRequest, ReplicateEventsRequest, ReplicateEventsV2Request, ReplicateRawEventsRequest, SyncActivityRequest,
    SyncShardStatusRequest,
};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// One normalized view of an incoming event batch, built from whichever
/// wire shape (v1, v2, raw) the caller used; §4.3's dispatch only cares
/// about these fields, not how the request arrived on the wire.
struct IngestInput {
    namespace_id: NamespaceId,
    workflow_id: WorkflowId,
    run_id: RunId,
    shard_id: u32,
    source_cluster: String,
    first_event_id: i64,
    next_event_id: i64,
    version: i64,
    replication_info: HashMap<String, ReplicationInfo>,
    history: Vec<HistoryEvent>,
    new_run_history: Option<Vec<HistoryEvent>>,
    reset_workflow: bool,
    force_buffer_events: bool,
}

/// The History Replicator core (§2, §4): the orchestrator that threads the
/// execution cache, the version-checking and start-event decision tables,
/// the conflict resolver, and signal reapplication into the request
/// surface the History service exposes.
pub struct HistoryReplicator<C: Clock> {
    resources: Resources<C>,
}

impl<C: Clock> HistoryReplicator<C> {
    pub fn new(resources: Resources<C>) -> Self {
        Self { resources }
    }

    pub fn execution_cache(&self) -> &ExecutionCache {
        &self.resources.execution_cache
    }

    /// `ReplicateEvents` (§4.2, v1 wire shape).
    pub async fn replicate_events(&self, cancel: &CancellationToken, request: ReplicateEventsRequest) -> ReplicatorResult<()> {
        let input = IngestInput {
            namespace_id: request.namespace_id,
            workflow_id: request.workflow_execution.workflow_id.clone(),
            run_id: request.workflow_execution.run_id,
            shard_id: shard_id_for(request.namespace_id),
            source_cluster: request.source_cluster,
            first_event_id: request.first_event_id,
            next_event_id: request.next_event_id,
            version: request.version,
            replication_info: request.replication_info,
            history: request.history,
            new_run_history: request.new_run_history,
            reset_workflow: request.reset_workflow,
            force_buffer_events: request.force_buffer_events,
        };
        self.ingest(cancel, input).await
    }

    /// `ReplicateEventsV2` (§4.2, v2 wire shape): explicit version-history
    /// items instead of per-cluster replication info. The v2 protocol
    /// carries no `source_cluster` or `replicationInfo` map, so we derive a
    /// best-effort source cluster from the incoming version itself via
    /// cluster metadata, and treat per-cluster replication info as absent,
    /// which routes any conflict through the "no entry" branch of §4.6
    /// rather than the more precise branches that need an explicit peer ack.
    pub async fn replicate_events_v2(&self, cancel: &CancellationToken, request: ReplicateEventsV2Request) -> ReplicatorResult<()> {
        let version = request.version_history_items.last().map(|i| i.version).unwrap_or(0);
        let first_event_id = request.events.first().map(|e| e.event_id).unwrap_or(1);
        let next_event_id = request.events.last().map(|e| e.event_id + 1).unwrap_or(first_event_id);
        let source_cluster = self.resources.cluster_metadata.cluster_name_for_failover_version(version).unwrap_or_default();

        let input = IngestInput {
            namespace_id: request.namespace_id,
            workflow_id: request.workflow_execution.workflow_id.clone(),
            run_id: request.workflow_execution.run_id,
            shard_id: shard_id_for(request.namespace_id),
            source_cluster,
            first_event_id,
            next_event_id,
            version,
            replication_info: HashMap::new(),
            history: request.events,
            new_run_history: request.new_run_events,
            reset_workflow: false,
            force_buffer_events: false,
        };
        self.ingest(cancel, input).await
    }

    /// `ReplicateRawEvents` (§4.2): the compressed-blob variant. The wire
    /// transport's actual compression scheme is out of scope (§1); this
    /// crate's "decoding" is the typed boundary a transport would serialize
    /// across (history-wire's own doc comment), so plain JSON stands in for
    /// whatever codec the real wire uses.
    pub async fn replicate_raw_events(&self, cancel: &CancellationToken, request: ReplicateRawEventsRequest) -> ReplicatorResult<()> {
        let history: Vec<HistoryEvent> = serde_json::from_slice(&request.events).map_err(|e| ReplicatorError::Internal(format!("failed to decode raw event blob: {e}")))?;
        let new_run_history = request
            .new_run_events
            .as_deref()
            .map(serde_json::from_slice::<Vec<HistoryEvent>>)
            .transpose()
            .map_err(|e| ReplicatorError::Internal(format!("failed to decode raw new-run event blob: {e}")))?;

        let input = IngestInput {
            namespace_id: request.namespace_id,
            workflow_id: request.workflow_execution.workflow_id.clone(),
            run_id: request.workflow_execution.run_id,
            shard_id: shard_id_for(request.namespace_id),
            source_cluster: request.source_cluster,
            first_event_id: request.first_event_id,
            next_event_id: request.next_event_id,
            version: request.version,
            replication_info: request.replication_info,
            history,
            new_run_history,
            reset_workflow: request.reset_workflow,
            force_buffer_events: false,
        };
        self.ingest(cancel, input).await
    }

    /// §4.3's three-way dispatch, shared by every wire shape once
    /// normalized to an [`IngestInput`].
    async fn ingest(&self, cancel: &CancellationToken, input: IngestInput) -> ReplicatorResult<()> {
        if input.history.first().map(HistoryEvent::is_start_event).unwrap_or(false) {
            replicate_workflow_started(
                &self.resources,
                cancel,
                StartReplicationInput {
                    namespace_id: input.namespace_id,
                    workflow_id: input.workflow_id.clone(),
                    run_id: input.run_id,
                    shard_id: input.shard_id,
                    history: input.history.clone(),
                },
            )
            .await?;
            self.resources.history_event_notifier.notify_new_event(&ExecutionKey::new(input.namespace_id, input.workflow_id.clone(), input.run_id));
            return self.replicate_new_run_if_any(cancel, &input).await;
        }

        match self.resources.execution_store.get_workflow_execution(input.namespace_id, &input.workflow_id, input.run_id).await {
            Err(StorageError::NotFound { .. }) => {
                apply_with_missing_mutable_state(
                    &self.resources,
                    cancel,
                    input.namespace_id,
                    &input.workflow_id,
                    input.shard_id,
                    &input.history,
                    input.reset_workflow,
                )
                .await?;
                // This path reconciles against whichever run is current, not
                // necessarily `input.run_id`; wake waiters on both since
                // either could be the one that just moved.
                self.resources.history_event_notifier.notify_new_event(&ExecutionKey::new(input.namespace_id, input.workflow_id.clone(), input.run_id));
                if let Ok(current) = self.resources.execution_store.get_current_execution(input.namespace_id, &input.workflow_id).await {
                    self.resources.history_event_notifier.notify_new_event(&ExecutionKey::new(input.namespace_id, input.workflow_id.clone(), current.run_id));
                }
            }
            Err(other) => return Err(map_storage_error(other, input.namespace_id, &input.workflow_id)),
            Ok(_) => {
                let key = ExecutionKey::new(input.namespace_id, input.workflow_id.clone(), input.run_id);
                let ctx = self.resources.execution_cache.get_or_create(key.clone());
                let mut guard = ctx.lock(cancel).await?;
                guard.load(self.resources.execution_store.as_ref(), &input.workflow_id).await.map_err(|e| map_storage_error(e, input.namespace_id, &input.workflow_id))?;

                let incoming = IncomingVersionContext {
                    version: input.version,
                    history: &input.history,
                    replication_info: input.replication_info.clone(),
                    source_cluster: input.source_cluster.clone(),
                };
                let outcome = check_version(&self.resources, cancel, &mut guard, input.namespace_id, &input.workflow_id, input.shard_id, &incoming).await?;
                if outcome == VersionCheckOutcome::Proceed {
                    apply_other_events(
                        &self.resources,
                        input.namespace_id,
                        &input.workflow_id,
                        input.shard_id,
                        &mut guard,
                        input.first_event_id,
                        input.next_event_id,
                        &input.history,
                        input.force_buffer_events,
                    )
                    .await?;
                    self.resources.history_event_notifier.notify_new_event(&key);
                }
            }
        }

        self.replicate_new_run_if_any(cancel, &input).await
    }

    /// A `WorkflowExecutionContinuedAsNew` event in the just-applied history
    /// names the successor run; if the request also carried that run's
    /// start history (`newRunHistory`/`newRunEvents`), replicate it through
    /// the same start-event path (§4.4) rather than waiting for a separate
    /// request.
    async fn replicate_new_run_if_any(&self, cancel: &CancellationToken, input: &IngestInput) -> ReplicatorResult<()> {
        let Some(new_run_history) = &input.new_run_history else { return Ok(()) };
        if new_run_history.is_empty() {
            return Ok(());
        }
        let Some(new_run_id) = input.history.iter().find_map(|e| match &e.attributes {
            HistoryEventAttributes::WorkflowExecutionContinuedAsNew { new_run_id } => Some(*new_run_id),
            _ => None,
        }) else {
            return Ok(());
        };
        replicate_workflow_started(
            &self.resources,
            cancel,
            StartReplicationInput {
                namespace_id: input.namespace_id,
                workflow_id: input.workflow_id.clone(),
                run_id: new_run_id,
                shard_id: input.shard_id,
                history: new_run_history.clone(),
            },
        )
        .await
    }

    /// `SyncActivity` (§4.2): synchronizes one activity's live state. Full
    /// activity-lifecycle modeling is out of scope (§1 Non-goals name the
    /// active-side mutation engine's activity lifecycle explicitly); what
    /// this core can faithfully do at its boundary is record that the
    /// target run has now been observed at this version, so later
    /// version-checking calls see the up-to-date replication-info entry for
    /// whichever cluster owns `request.version`.
    pub async fn sync_activity(&self, cancel: &CancellationToken, request: SyncActivityRequest) -> ReplicatorResult<()> {
        let namespace_id = request.namespace_id;
        let workflow_id = request.workflow_execution.workflow_id.clone();
        let run_id = request.workflow_execution.run_id;
        let key = ExecutionKey::new(namespace_id, workflow_id.clone(), run_id);
        let ctx = self.resources.execution_cache.get_or_create(key);
        let mut guard = ctx.lock(cancel).await?;
        guard.load(self.resources.execution_store.as_ref(), &workflow_id).await.map_err(|e| map_storage_error(e, namespace_id, &workflow_id))?;

        let source_cluster = self.resources.cluster_metadata.cluster_name_for_failover_version(request.version).unwrap_or_default();
        // Loaded by `guard.load` immediately above.
        #[allow(clippy::expect_used)]
        let state = guard.get_mut().expect("loaded above");
        state.replication_state_mut().observe_peer(&source_cluster, request.version, request.started_id.max(request.scheduled_id));
        tracing::debug!(namespace_id = %namespace_id, workflow_id = %workflow_id, run_id = %run_id, scheduled_id = request.scheduled_id, "synced activity state");
        Ok(())
    }

    /// `SyncShardStatus` (§4.2): a peer liveness/ack signal, routed straight
    /// through to the shard store.
    pub async fn sync_shard_status(&self, request: SyncShardStatusRequest) -> ReplicatorResult<()> {
        self.resources.shard_store.sync_shard_status(request.shard_id, &request.source_cluster, request.timestamp_ms as i64).await.map_err(map_shard_error)
    }

    /// `ReapplyEvents` (§4.2 auxiliary): replays the signal events in the
    /// request against the named workflow through the signal-reapplication
    /// pipeline (§4.8), independent of any ingestion request.
    pub async fn reapply_events(&self, cancel: &CancellationToken, request: ReapplyEventsRequest) -> ReplicatorResult<()> {
        reapply_signals(
            &self.resources,
            cancel,
            request.namespace_id,
            &request.workflow_execution.workflow_id,
            request.workflow_execution.run_id,
            shard_id_for(request.namespace_id),
            &request.events,
        )
        .await?;
        self.resources.history_event_notifier.notify_new_event(&ExecutionKey::new(
            request.namespace_id,
            request.workflow_execution.workflow_id.clone(),
            request.workflow_execution.run_id,
        ));
        Ok(())
    }

    /// `PollMutableState` (§9 "Concurrency shape"): block until the named
    /// run's `next_event_id` advances past `expected_next_event_id`, then
    /// return the fresh snapshot. Returns immediately if the run is already
    /// past that point by the time this is called, so a waiter that missed
    /// the notification for the event it was waiting on still observes it.
    pub async fn poll_mutable_state(
        &self,
        cancel: &CancellationToken,
        namespace_id: NamespaceId,
        workflow_id: &WorkflowId,
        run_id: RunId,
        expected_next_event_id: i64,
    ) -> ReplicatorResult<history_core::WorkflowSnapshot> {
        let key = ExecutionKey::new(namespace_id, workflow_id.clone(), run_id);
        loop {
            let snapshot = self.resources.execution_store.get_workflow_execution(namespace_id, workflow_id, run_id).await.map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;
            if snapshot.execution_info.next_event_id > expected_next_event_id || snapshot.execution_info.state.is_closed() {
                return Ok(snapshot);
            }
            self.resources.history_event_notifier.wait_for_new_event(&key, cancel).await?;
        }
    }

    /// `RefreshWorkflowTasks` (§4.2 auxiliary).
    pub async fn refresh_workflow_tasks(&self, request: RefreshWorkflowTasksRequest) -> ReplicatorResult<Vec<GeneratedTask>> {
        refresh_workflow_tasks_impl(&self.resources, request.namespace_id, &request.workflow_execution.workflow_id, request.workflow_execution.run_id).await
    }

    /// `GetReplicationMessages` (§4.2 auxiliary).
    pub async fn get_replication_messages(&self, shard_id: u32, last_read_task_id: i64, max_count: usize) -> ReplicatorResult<Page<ReplicationTask>> {
        replication_messages::get_replication_messages(&self.resources, shard_id, last_read_task_id, max_count).await
    }

    /// `ReadDLQMessages` (§4.2 auxiliary). Only the replication-task DLQ is
    /// modeled at the core boundary (§1: namespace-metadata DLQ durable
    /// storage is out of scope, named only by interface); a namespace-kind
    /// request is accepted and returns an empty page rather than erroring,
    /// matching wire compatibility for a type this deployment doesn't back.
    pub async fn read_dlq_messages(&self, dlq_type: DlqTokenKind, shard_id: u32, page_token: Option<PageToken>, max_count: usize) -> ReplicatorResult<Page<DlqMessage>> {
        if dlq_type != DlqTokenKind::Replication {
            return Ok(Page { items: Vec::new(), next_page_token: None });
        }
        replication_messages::read_dlq_messages(&self.resources, shard_id, page_token, max_count).await
    }

    /// `PurgeDLQMessages` (§4.2 auxiliary).
    pub async fn purge_dlq_messages(&self, dlq_type: DlqTokenKind, shard_id: u32, inclusive_task_id: i64) -> ReplicatorResult<()> {
        if dlq_type != DlqTokenKind::Replication {
            return Ok(());
        }
        replication_messages::purge_dlq_messages(&self.resources, shard_id, inclusive_task_id).await
    }

    /// `MergeDLQMessages` (§4.2 auxiliary).
    pub async fn merge_dlq_messages(&self, dlq_type: DlqTokenKind, shard_id: u32, task_ids: &[i64]) -> ReplicatorResult<Page<DlqMessage>> {
        if dlq_type != DlqTokenKind::Replication {
            return Ok(Page { items: Vec::new(), next_page_token: None });
        }
        replication_messages::merge_dlq_messages(&self.resources, shard_id, task_ids).await
    }

    /// Drive one queued [`ReplicationTask`] (as a local replication-task
    /// processor would, polling `GetReplicationMessages` against its own
    /// shard) through the ingestion dispatcher, routing conflict-class
    /// errors to the DLQ per §7's error policy instead of propagating them
    /// to a caller that has no peer connection to retry against.
    pub async fn process_replication_task(&self, cancel: &CancellationToken, shard_id: u32, source_cluster: String, task: ReplicationTask) -> ReplicatorResult<()> {
        let input = IngestInput {
            namespace_id: task.namespace_id,
            workflow_id: task.workflow_id.clone(),
            run_id: task.run_id,
            shard_id,
            source_cluster: source_cluster.clone(),
            first_event_id: task.event.event_id,
            next_event_id: task.event.event_id + 1,
            version: task.event.version,
            replication_info: HashMap::new(),
            history: vec![task.event.clone()],
            new_run_history: None,
            reset_workflow: false,
            force_buffer_events: false,
        };
        match self.ingest(cancel, input).await {
            Err(err) if err.is_conflict() => {
                let reason = err.to_string();
                route_to_dlq(&self.resources, shard_id, source_cluster, task, reason).await?;
                Err(err)
            }
            other => other,
        }
    }
}

fn map_shard_error(err: StorageError) -> ReplicatorError {
    match err {
        StorageError::ShardOwnershipLost { .. } => ReplicatorError::ShardOwnershipLost,
        StorageError::ConditionFailed { .. } => ReplicatorError::ConditionFailed,
        other => ReplicatorError::Internal(other.to_string()),
    }
}

fn shard_id_for(namespace_id: NamespaceId) -> u32 {
    // Shard assignment is a property of the (out-of-scope, §1) shard
    // controller; this crate only needs a stable mapping so replicated
    // events for the same namespace land in the same shard's bookkeeping.
    let bytes = namespace_id.0.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
#[path = "replicator_tests.rs"]
mod tests;
