// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History events: the unit of replication.

use crate::execution_info::RetryPolicy;
use crate::failover::FailoverVersion;
use crate::identity::RunId;
use serde::{Deserialize, Serialize};

/// One entry in a run's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub event_id: i64,
    pub version: FailoverVersion,
    /// Monotone per-shard task ID stamped at append time; used to break
    /// version ties when deciding which of two concurrently-written runs
    /// at the same failover version should win (§4.4).
    pub task_id: i64,
    pub timestamp_ms: u64,
    pub attributes: HistoryEventAttributes,
}

impl HistoryEvent {
    pub fn new(event_id: i64, version: FailoverVersion, task_id: i64, timestamp_ms: u64, attributes: HistoryEventAttributes) -> Self {
        Self { event_id, version, task_id, timestamp_ms, attributes }
    }

    pub fn is_start_event(&self) -> bool {
        self.event_id == 1 && matches!(self.attributes, HistoryEventAttributes::WorkflowExecutionStarted { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.attributes,
            HistoryEventAttributes::WorkflowExecutionCompleted { .. }
                | HistoryEventAttributes::WorkflowExecutionFailed { .. }
                | HistoryEventAttributes::WorkflowExecutionTimedOut
                | HistoryEventAttributes::WorkflowExecutionCanceled { .. }
                | HistoryEventAttributes::WorkflowExecutionTerminated { .. }
                | HistoryEventAttributes::WorkflowExecutionContinuedAsNew { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryEventAttributes {
    WorkflowExecutionStarted {
        workflow_type: String,
        input: Vec<u8>,
        workflow_timeout_seconds: u32,
        decision_task_timeout_seconds: u32,
        /// Set when this run began as a workflow-id-reuse continuation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        continued_from_run_id: Option<RunId>,
        #[serde(default)]
        retry_policy: RetryPolicy,
    },
    WorkflowExecutionSignaled {
        signal_name: String,
        input: Vec<u8>,
        identity: String,
    },
    WorkflowExecutionTerminated {
        reason: String,
        details: Vec<u8>,
        identity: String,
    },
    WorkflowExecutionCompleted {
        result: Vec<u8>,
    },
    WorkflowExecutionFailed {
        reason: String,
        details: Vec<u8>,
    },
    WorkflowExecutionTimedOut,
    WorkflowExecutionCanceled {
        details: Vec<u8>,
    },
    WorkflowExecutionContinuedAsNew {
        new_run_id: RunId,
    },
    DecisionTaskScheduled {
        tasklist: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        bypass_task_generation: bool,
    },
    DecisionTaskStarted {
        scheduled_event_id: i64,
        identity: String,
    },
    DecisionTaskCompleted {
        scheduled_event_id: i64,
        started_event_id: i64,
    },
    DecisionTaskFailed {
        scheduled_event_id: i64,
        started_event_id: i64,
        cause: DecisionTaskFailedCause,
    },
}

/// Why an in-flight decision task was failed out from under the workflow.
/// `FailoverCloseDecision` is the cause used by the version-checking path
/// (§4.6) when a conflict forces buffered events to flush before a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionTaskFailedCause {
    Timeout,
    Reset,
    FailoverCloseDecision,
}

crate::simple_display! {
    DecisionTaskFailedCause {
        Timeout => "timeout",
        Reset => "reset",
        FailoverCloseDecision => "failover_close_decision",
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
