// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The state builder: applies a sequence of incoming history events onto a
//! mutable-state builder, folding in their event-type-specific effects and
//! collecting the side tasks that would need to be generated (§2 "State
//! Builder"). Scheduling those tasks onto the transfer/timer/replication
//! queues is out of scope (§1); this module only computes what tasks a
//! faithful implementation would hand off.

use crate::events::{DecisionTaskFailedCause, HistoryEvent, HistoryEventAttributes};
use crate::execution_info::{DecisionInfo, ExecutionState};
use crate::mutable_state::MutableStateBuilder;

/// A side task the state builder determined is now due. The concrete
/// transfer/timer/replication queues that consume these live outside this
/// crate (§1); this is the handoff contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedTask {
    ScheduleDecisionTask { event_id: i64 },
    StartDecisionTaskTimeout { schedule_id: i64 },
    RecordWorkflowClosed,
    ReplicateToCluster { event_id: i64 },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateBuilderError {
    #[error("event {actual} is not contiguous with next_event_id {expected}")]
    NonContiguousEventId { expected: i64, actual: i64 },
}

/// Apply `events` in order onto `state`. All-or-nothing: if any event fails
/// the contiguity check the mutable state is left as it was after the last
/// successfully-applied event (matching the "no partial persistence writes"
/// rule — callers commit only after this returns `Ok`, so a partial apply
/// here never reaches storage).
pub fn apply_events(state: &mut MutableStateBuilder, events: &[HistoryEvent]) -> Result<Vec<GeneratedTask>, StateBuilderError> {
    let mut tasks = Vec::new();
    for event in events {
        let expected = state.get_next_event_id();
        if event.event_id != expected {
            return Err(StateBuilderError::NonContiguousEventId { expected, actual: event.event_id });
        }
        apply_one(state, event, &mut tasks);
    }
    Ok(tasks)
}

fn apply_one(state: &mut MutableStateBuilder, event: &HistoryEvent, tasks: &mut Vec<GeneratedTask>) {
    state.record_replicated_event(event);

    match &event.attributes {
        HistoryEventAttributes::WorkflowExecutionStarted { .. } => {
            state.execution_info_mut().state = ExecutionState::Created;
        }
        HistoryEventAttributes::WorkflowExecutionSignaled { .. } => {
            // No state-machine effect beyond recording the event; whether a
            // decision needs scheduling is evaluated by the caller via
            // `has_pending_decision`, matching the signal-reapplication
            // procedure (§4.8) which this path and that one share.
        }
        HistoryEventAttributes::DecisionTaskScheduled { tasklist, .. } => {
            state.execution_info_mut().decision = Some(DecisionInfo {
                version: event.version,
                schedule_id: event.event_id,
                started_id: -1,
                timeout: state.execution_info().decision_task_timeout,
                tasklist: tasklist.clone(),
            });
            if state.execution_info().state == ExecutionState::Created {
                state.execution_info_mut().state = ExecutionState::Running;
            }
            tasks.push(GeneratedTask::ScheduleDecisionTask { event_id: event.event_id });
            tasks.push(GeneratedTask::StartDecisionTaskTimeout { schedule_id: event.event_id });
        }
        HistoryEventAttributes::DecisionTaskStarted { .. } => {
            if let Some(decision) = state.execution_info_mut().decision.as_mut() {
                decision.started_id = event.event_id;
            }
        }
        HistoryEventAttributes::DecisionTaskCompleted { .. } => {
            state.execution_info_mut().decision = None;
        }
        HistoryEventAttributes::DecisionTaskFailed { cause, .. } => {
            state.execution_info_mut().decision = None;
            if *cause == DecisionTaskFailedCause::FailoverCloseDecision {
                tasks.push(GeneratedTask::ScheduleDecisionTask { event_id: event.event_id });
            }
        }
        HistoryEventAttributes::WorkflowExecutionTerminated { .. }
        | HistoryEventAttributes::WorkflowExecutionCompleted { .. }
        | HistoryEventAttributes::WorkflowExecutionFailed { .. }
        | HistoryEventAttributes::WorkflowExecutionTimedOut
        | HistoryEventAttributes::WorkflowExecutionCanceled { .. }
        | HistoryEventAttributes::WorkflowExecutionContinuedAsNew { .. } => {
            state.execution_info_mut().state = ExecutionState::Completed;
            state.execution_info_mut().decision = None;
            tasks.push(GeneratedTask::RecordWorkflowClosed);
        }
    }

    tasks.push(GeneratedTask::ReplicateToCluster { event_id: event.event_id });
}

#[cfg(test)]
#[path = "state_builder_tests.rs"]
mod tests;
