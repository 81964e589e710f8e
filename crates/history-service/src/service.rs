// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin request-handler façade: one method per protocol message (§6),
//! wrapping the replicator core with the metrics increments and tracing
//! spans a transport layer would want on every call. No request routing or
//! wire decoding lives here — that's the out-of-scope transport (§1); this
//! is the seam a transport adapter plugs into.

use history_core::clock::Clock;
use history_core::error::ReplicatorResult;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::WorkflowSnapshot;
use history_replicator::HistoryReplicator;
use history_storage::shard_store::{DlqMessage, Page, ReplicationTask};
use history_wire::messages::{
    GetReplicationMessagesRequest, MergeDlqMessagesRequest, PurgeDlqMessagesRequest, ReadDlqMessagesRequest, ReapplyEventsRequest, RefreshWorkflowTasksRequest, ReplicateEventsRequest,
    ReplicateEventsV2Request, ReplicateRawEventsRequest, ReplicationMessages, SyncActivityRequest, SyncShardStatusRequest,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::metrics::Metrics;

/// Binds a replicator instance to the metrics it reports through. Cloning
/// is cheap (two `Arc`s) so a transport layer can hand one copy per
/// connection/request without contention.
pub struct Service<C: Clock> {
    replicator: Arc<HistoryReplicator<C>>,
    metrics: Arc<Metrics>,
}

impl<C: Clock> Clone for Service<C> {
    fn clone(&self) -> Self {
        Self { replicator: Arc::clone(&self.replicator), metrics: Arc::clone(&self.metrics) }
    }
}

impl<C: Clock> Service<C> {
    pub fn new(replicator: Arc<HistoryReplicator<C>>, metrics: Arc<Metrics>) -> Self {
        Self { replicator, metrics }
    }

    pub fn replicator(&self) -> &Arc<HistoryReplicator<C>> {
        &self.replicator
    }

    fn record_outcome(&self, result: &ReplicatorResult<()>) {
        match result {
            Ok(()) => self.metrics.events_applied_total.inc(),
            Err(err) if err.is_conflict() => self.metrics.conflicts_total.with_label_values(&[conflict_kind(err)]).inc(),
            Err(_) => {}
        }
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id, run_id = %request.workflow_execution.run_id))]
    pub async fn replicate_events(&self, cancel: &CancellationToken, request: ReplicateEventsRequest) -> ReplicatorResult<()> {
        let result = self.replicator.replicate_events(cancel, request).await;
        self.record_outcome(&result);
        result
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id, run_id = %request.workflow_execution.run_id))]
    pub async fn replicate_events_v2(&self, cancel: &CancellationToken, request: ReplicateEventsV2Request) -> ReplicatorResult<()> {
        let result = self.replicator.replicate_events_v2(cancel, request).await;
        self.record_outcome(&result);
        result
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id, run_id = %request.workflow_execution.run_id))]
    pub async fn replicate_raw_events(&self, cancel: &CancellationToken, request: ReplicateRawEventsRequest) -> ReplicatorResult<()> {
        let result = self.replicator.replicate_raw_events(cancel, request).await;
        self.record_outcome(&result);
        result
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id))]
    pub async fn sync_activity(&self, cancel: &CancellationToken, request: SyncActivityRequest) -> ReplicatorResult<()> {
        self.replicator.sync_activity(cancel, request).await
    }

    #[tracing::instrument(skip_all, fields(shard_id = request.shard_id))]
    pub async fn sync_shard_status(&self, request: SyncShardStatusRequest) -> ReplicatorResult<()> {
        self.replicator.sync_shard_status(request).await
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id))]
    pub async fn reapply_events(&self, cancel: &CancellationToken, request: ReapplyEventsRequest) -> ReplicatorResult<()> {
        self.replicator.reapply_events(cancel, request).await
    }

    /// Long-poll read (§5 "Shared state": the history-event notifier's
    /// reason for existing). Blocks until `next_event_id` has advanced past
    /// `expected_next_event_id`, the run closes, or `cancel` fires.
    #[tracing::instrument(skip_all, fields(namespace_id = %namespace_id, workflow_id = %workflow_id, run_id = %run_id))]
    pub async fn poll_mutable_state(
        &self,
        cancel: &CancellationToken,
        namespace_id: NamespaceId,
        workflow_id: &WorkflowId,
        run_id: RunId,
        expected_next_event_id: i64,
    ) -> ReplicatorResult<WorkflowSnapshot> {
        self.replicator.poll_mutable_state(cancel, namespace_id, workflow_id, run_id, expected_next_event_id).await
    }

    #[tracing::instrument(skip_all, fields(namespace_id = %request.namespace_id, workflow_id = %request.workflow_execution.workflow_id))]
    pub async fn refresh_workflow_tasks(&self, request: RefreshWorkflowTasksRequest) -> ReplicatorResult<Vec<history_core::GeneratedTask>> {
        self.replicator.refresh_workflow_tasks(request).await
    }

    pub async fn get_replication_messages(&self, request: GetReplicationMessagesRequest) -> ReplicatorResult<std::collections::HashMap<u32, ReplicationMessages>> {
        let mut out = std::collections::HashMap::with_capacity(request.tokens.len());
        for token in &request.tokens {
            let page = self.replicator.get_replication_messages(token.shard_id, token.last_retrieved_message_id, 100).await?;
            self.metrics.replication_tasks_polled_total.inc_by(page.items.len() as u64);
            out.insert(
                token.shard_id,
                ReplicationMessages {
                    last_retrieved_message_id: last_task_id(&page.items).unwrap_or(token.last_retrieved_message_id),
                    has_more: page.next_page_token.is_some(),
                    tasks: page.items.into_iter().map(|t| t.event).collect(),
                },
            );
        }
        Ok(out)
    }

    pub async fn read_dlq_messages(&self, request: ReadDlqMessagesRequest) -> ReplicatorResult<Page<DlqMessage>> {
        self.replicator
            .read_dlq_messages(request.dlq_type, request.shard_id, request.next_page_token, request.maximum_page_size.max(0) as usize)
            .await
    }

    pub async fn purge_dlq_messages(&self, request: PurgeDlqMessagesRequest) -> ReplicatorResult<()> {
        self.replicator.purge_dlq_messages(request.dlq_type, request.shard_id, request.inclusive_end_message_id).await
    }

    pub async fn merge_dlq_messages(&self, request: MergeDlqMessagesRequest) -> ReplicatorResult<Page<DlqMessage>> {
        self.replicator.merge_dlq_messages(request.dlq_type, request.shard_id, &request.message_ids).await
    }

    /// Drains and applies one shard's queued replication tasks against a
    /// peer's claimed source cluster, routing conflicts to the DLQ as the
    /// core already does (§7). Used by the background poller in
    /// [`crate::replication_worker`].
    pub async fn process_replication_task(&self, cancel: &CancellationToken, shard_id: u32, source_cluster: String, task: ReplicationTask) -> ReplicatorResult<()> {
        let result = self.replicator.process_replication_task(cancel, shard_id, source_cluster, task).await;
        if let Err(err) = &result {
            if err.is_conflict() {
                self.metrics.dlq_routed_total.inc();
            }
        }
        result
    }
}

fn last_task_id(tasks: &[ReplicationTask]) -> Option<i64> {
    tasks.last().map(|t| t.task_id)
}

fn conflict_kind(err: &history_core::error::ReplicatorError) -> &'static str {
    use history_core::error::ReplicatorError;
    match err {
        ReplicatorError::MoreThan2DC { .. } => "more_than_2dc",
        ReplicatorError::ImpossibleRemoteClaimSeenHigherVersion { .. } => "impossible_remote_claim",
        ReplicatorError::CorruptedReplicationInfo { .. } => "corrupted_replication_info",
        _ => "other",
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
