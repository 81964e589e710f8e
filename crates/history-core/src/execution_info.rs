// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run execution metadata (§3 `ExecutionInfo`).

use crate::identity::RunId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run lifecycle state (§4.10). Transitions only move forward:
/// `Created -> Running -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    Created,
    Running,
    Completed,
}

crate::simple_display! {
    ExecutionState {
        Created => "created",
        Running => "running",
        Completed => "completed",
    }
}

impl ExecutionState {
    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionState::Running)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ExecutionState::Completed)
    }

    /// Whether transitioning from `self` to `next` is a legal forward move.
    pub fn can_transition_to(&self, next: ExecutionState) -> bool {
        matches!(
            (self, next),
            (ExecutionState::Created, ExecutionState::Running)
                | (ExecutionState::Created, ExecutionState::Completed)
                | (ExecutionState::Running, ExecutionState::Completed)
                | (ExecutionState::Created, ExecutionState::Created)
                | (ExecutionState::Running, ExecutionState::Running)
                | (ExecutionState::Completed, ExecutionState::Completed)
        )
    }
}

/// In-flight decision task bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionInfo {
    pub version: i64,
    pub schedule_id: i64,
    pub started_id: i64,
    pub timeout: Duration,
    pub tasklist: String,
}

/// A run started as a child of another workflow records its parent here so
/// parent-close-policy activity (out of scope for this crate) can find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentExecutionInfo {
    pub workflow_id: String,
    pub run_id: RunId,
    pub initiated_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub backoff_coefficient: f64,
    pub maximum_interval: Duration,
    pub maximum_attempts: i32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            backoff_coefficient: 2.0,
            maximum_interval: Duration::from_secs(100),
            maximum_attempts: 0,
        }
    }
}

/// Per-run execution metadata, the mutable-state builder's `ExecutionInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionInfo {
    pub run_id: RunId,
    pub state: ExecutionState,
    pub status: String,
    pub next_event_id: i64,
    pub last_event_task_id: i64,
    pub branch_token: Vec<u8>,
    pub decision: Option<DecisionInfo>,
    pub parent: Option<ParentExecutionInfo>,
    pub workflow_timeout: Duration,
    pub decision_task_timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub cron_schedule: Option<String>,
    pub create_request_id: String,
}

impl ExecutionInfo {
    pub fn new(run_id: RunId, branch_token: Vec<u8>, create_request_id: impl Into<String>) -> Self {
        Self {
            run_id,
            state: ExecutionState::Created,
            status: "running".to_string(),
            next_event_id: 1,
            last_event_task_id: 0,
            branch_token,
            decision: None,
            parent: None,
            workflow_timeout: Duration::from_secs(24 * 60 * 60),
            decision_task_timeout: Duration::from_secs(10),
            retry_policy: RetryPolicy::default(),
            cron_schedule: None,
            create_request_id: create_request_id.into(),
        }
    }

    /// Invariant 1: `next_event_id - 1 == last_write_event_id`.
    pub fn last_write_event_id(&self) -> i64 {
        self.next_event_id - 1
    }

    pub fn has_pending_decision(&self) -> bool {
        self.decision.is_some()
    }

    crate::setters! {
        option { cron_schedule: String }
    }
}

#[cfg(test)]
#[path = "execution_info_tests.rs"]
mod tests;
