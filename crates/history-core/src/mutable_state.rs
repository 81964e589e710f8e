// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mutable-state builder: the authoritative in-memory view of one run.
//!
//! Exposes three capability groups, matching the external design (§9):
//! *query* methods are pure reads; *mutate* methods append pending events
//! without committing; [`MutableStateBuilder::close_transaction_as_snapshot`]
//! is the sole commit operation, producing a [`WorkflowSnapshot`] plus the
//! list of events to append to the history store.

use crate::buffered_events::BufferedEvents;
use crate::events::{DecisionTaskFailedCause, HistoryEvent, HistoryEventAttributes};
use crate::execution_info::{DecisionInfo, ExecutionInfo, ExecutionState};
use crate::failover::FailoverVersion;
use crate::identity::NamespaceId;
use crate::replication_state::ReplicationState;
use crate::version_history::VersionHistories;

/// Whether a commit is being made on behalf of this cluster's own authority
/// (`Active`) or purely to record replicated state (`Passive`). Active
/// commits are the only ones allowed to schedule user-visible work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPolicy {
    Active,
    Passive,
}

/// A point-in-time, persistable view of a run, produced by
/// [`MutableStateBuilder::close_transaction_as_snapshot`].
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    pub namespace_id: NamespaceId,
    pub execution_info: ExecutionInfo,
    pub replication_state: ReplicationState,
    pub version_histories: VersionHistories,
    /// Carried across a conflict-resolver rebuild so the eventual commit
    /// remains conditional on the caller's original optimistic-concurrency
    /// read (invariant 6).
    pub update_condition: i64,
}

pub struct MutableStateBuilder {
    namespace_id: NamespaceId,
    execution_info: ExecutionInfo,
    replication_state: ReplicationState,
    version_histories: VersionHistories,
    buffered_events: BufferedEvents,
    pending_events: Vec<HistoryEvent>,
    update_condition: i64,
}

impl MutableStateBuilder {
    pub fn new(
        namespace_id: NamespaceId,
        execution_info: ExecutionInfo,
        replication_state: ReplicationState,
        version_histories: VersionHistories,
    ) -> Self {
        Self {
            namespace_id,
            execution_info,
            replication_state,
            version_histories,
            buffered_events: BufferedEvents::new(),
            pending_events: Vec::new(),
            update_condition: 0,
        }
    }

    pub fn from_snapshot(snapshot: WorkflowSnapshot) -> Self {
        Self {
            namespace_id: snapshot.namespace_id,
            execution_info: snapshot.execution_info,
            replication_state: snapshot.replication_state,
            version_histories: snapshot.version_histories,
            buffered_events: BufferedEvents::new(),
            pending_events: Vec::new(),
            update_condition: snapshot.update_condition,
        }
    }

    // --- queries ---

    pub fn namespace_id(&self) -> NamespaceId {
        self.namespace_id
    }

    pub fn execution_info(&self) -> &ExecutionInfo {
        &self.execution_info
    }

    pub fn execution_info_mut(&mut self) -> &mut ExecutionInfo {
        &mut self.execution_info
    }

    pub fn replication_state(&self) -> &ReplicationState {
        &self.replication_state
    }

    /// Mutable access for capabilities that don't fit the `add_*`/`update_*`
    /// naming the other mutators use, e.g. recording a peer observation off
    /// a `SyncActivity` request without appending any event of our own.
    pub fn replication_state_mut(&mut self) -> &mut ReplicationState {
        &mut self.replication_state
    }

    pub fn version_histories(&self) -> &VersionHistories {
        &self.version_histories
    }

    pub fn get_next_event_id(&self) -> i64 {
        self.execution_info.next_event_id
    }

    pub fn get_last_write_version(&self) -> FailoverVersion {
        self.replication_state.last_write_version
    }

    pub fn is_workflow_execution_running(&self) -> bool {
        self.execution_info.state.is_running()
    }

    pub fn has_pending_decision(&self) -> bool {
        self.execution_info.has_pending_decision()
    }

    pub fn has_buffered_events(&self) -> bool {
        !self.buffered_events.is_empty()
    }

    pub fn buffered_events(&self) -> &BufferedEvents {
        &self.buffered_events
    }

    pub fn buffered_events_mut(&mut self) -> &mut BufferedEvents {
        &mut self.buffered_events
    }

    pub fn get_in_flight_decision(&self) -> Option<DecisionInfo> {
        self.execution_info.decision.clone()
    }

    pub fn get_update_condition(&self) -> i64 {
        self.update_condition
    }

    pub fn get_current_branch_token(&self) -> &[u8] {
        &self.execution_info.branch_token
    }

    // --- mutators: append pending events, advance next_event_id ---

    fn next_event_id(&mut self) -> i64 {
        let id = self.execution_info.next_event_id;
        self.execution_info.next_event_id += 1;
        id
    }

    /// Stamp the version this cluster is now writing under. `force_update`
    /// is set by signal reapplication (§4.8), which must take ownership of
    /// the run's version even though the events being appended originated
    /// on a remote cluster.
    pub fn update_current_version(&mut self, version: FailoverVersion, force_update: bool) {
        if force_update || version > self.replication_state.current_version {
            self.replication_state.current_version = version;
        }
    }

    pub fn add_workflow_execution_signaled(
        &mut self,
        signal_name: impl Into<String>,
        input: Vec<u8>,
        identity: impl Into<String>,
        task_id: i64,
        timestamp_ms: u64,
    ) -> i64 {
        let event_id = self.next_event_id();
        let version = self.replication_state.current_version;
        self.pending_events.push(HistoryEvent::new(
            event_id,
            version,
            task_id,
            timestamp_ms,
            HistoryEventAttributes::WorkflowExecutionSignaled {
                signal_name: signal_name.into(),
                input,
                identity: identity.into(),
            },
        ));
        event_id
    }

    pub fn add_workflow_execution_terminated_event(
        &mut self,
        reason: impl Into<String>,
        details: Vec<u8>,
        identity: impl Into<String>,
        task_id: i64,
        timestamp_ms: u64,
    ) -> i64 {
        let event_id = self.next_event_id();
        let version = self.replication_state.current_version;
        self.pending_events.push(HistoryEvent::new(
            event_id,
            version,
            task_id,
            timestamp_ms,
            HistoryEventAttributes::WorkflowExecutionTerminated {
                reason: reason.into(),
                details,
                identity: identity.into(),
            },
        ));
        self.execution_info.state = ExecutionState::Completed;
        self.execution_info.decision = None;
        event_id
    }

    pub fn add_decision_task_scheduled_event(
        &mut self,
        tasklist: impl Into<String>,
        bypass_task_generation: bool,
        task_id: i64,
        timestamp_ms: u64,
    ) -> i64 {
        let event_id = self.next_event_id();
        let version = self.replication_state.current_version;
        let tasklist = tasklist.into();
        self.pending_events.push(HistoryEvent::new(
            event_id,
            version,
            task_id,
            timestamp_ms,
            HistoryEventAttributes::DecisionTaskScheduled { tasklist: tasklist.clone(), bypass_task_generation },
        ));
        self.execution_info.decision = Some(DecisionInfo {
            version,
            schedule_id: event_id,
            started_id: -1,
            timeout: self.execution_info.decision_task_timeout,
            tasklist: "default".to_string(),
        });
        if self.execution_info.state == ExecutionState::Created {
            self.execution_info.state = ExecutionState::Running;
        }
        event_id
    }

    pub fn add_decision_task_failed_event(&mut self, cause: DecisionTaskFailedCause, task_id: i64, timestamp_ms: u64) -> i64 {
        let decision = self.execution_info.decision.take();
        let (scheduled_event_id, started_event_id) =
            decision.map(|d| (d.schedule_id, d.started_id)).unwrap_or((-1, -1));
        let event_id = self.next_event_id();
        let version = self.replication_state.current_version;
        self.pending_events.push(HistoryEvent::new(
            event_id,
            version,
            task_id,
            timestamp_ms,
            HistoryEventAttributes::DecisionTaskFailed { scheduled_event_id, started_event_id, cause },
        ));
        event_id
    }

    /// Fold an already-finalized event (one replicated from a peer, with its
    /// `event_id`/`version`/`task_id` already assigned) directly into
    /// committed state, bypassing the local `next_event_id` allocator that
    /// the `add_*` mutators use for events this cluster originates. Used by
    /// the state builder (see `state_builder.rs`) when applying incoming
    /// history; the event-type-specific bookkeeping (closing the run,
    /// tracking the in-flight decision, ...) is the state builder's job, not
    /// this method's.
    pub fn record_replicated_event(&mut self, event: &HistoryEvent) {
        // The state builder (state_builder.rs) only calls this after checking
        // the incoming event continues the current branch contiguously.
        #[allow(clippy::expect_used)]
        self.version_histories
            .current_mut()
            .append(event.event_id, event.version)
            .expect("caller validated contiguity before calling record_replicated_event");
        self.replication_state.record_write(event.version, event.event_id);
        self.execution_info.next_event_id = event.event_id + 1;
        self.execution_info.last_event_task_id = event.task_id;
        self.replication_state.current_version = event.version;
    }

    // --- commit ---

    /// Commit pending events: fold them into the version history and
    /// replication state, produce a [`WorkflowSnapshot`], and return the
    /// events grouped by the branch token they were appended to. Does not
    /// touch storage; the caller is responsible for the actual
    /// `AppendHistoryNodes`/`Create`/`UpdateWorkflowExecution` calls.
    pub fn close_transaction_as_snapshot(
        &mut self,
        _now_ms: u64,
        policy: TransactionPolicy,
    ) -> (WorkflowSnapshot, Vec<HistoryEvent>) {
        let events = std::mem::take(&mut self.pending_events);
        for event in &events {
            // Every `add_*` mutator allocates event IDs from `next_event_id` in
            // order, so `pending_events` is always contiguous and monotone.
            #[allow(clippy::expect_used)]
            self.version_histories
                .current_mut()
                .append(event.event_id, event.version)
                .expect("mutators only append monotone, non-regressing events");
            self.replication_state.record_write(event.version, event.event_id);
            self.execution_info.last_event_task_id = event.task_id;
        }
        if policy == TransactionPolicy::Passive {
            // Passive commits never originate user-visible work; nothing
            // further to reconcile here beyond the bookkeeping above.
        }
        self.update_condition += 1;
        let snapshot = WorkflowSnapshot {
            namespace_id: self.namespace_id,
            execution_info: self.execution_info.clone(),
            replication_state: self.replication_state.clone(),
            version_histories: self.version_histories.clone(),
            update_condition: self.update_condition,
        };
        (snapshot, events)
    }
}

#[cfg(test)]
#[path = "mutable_state_tests.rs"]
mod tests;
