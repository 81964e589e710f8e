// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol-stable task numbering (§6). These discriminants are persisted
//! by shard controllers and must never be renumbered or reused.

use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum TaskCategory {
    Transfer = 2,
    Timer = 3,
    Replication = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum TaskType {
    ActivityTask = 0,
    DecisionTask = 1,
    CloseExecution = 2,
    CancelExecution = 3,
    SignalExecution = 4,
    StartChildExecution = 5,
    RecordWorkflowStarted = 6,
    ResetWorkflow = 7,
    RecordWorkflowClosed = 8,
    UpsertWorkflowSearchAttributes = 9,
    UserTimer = 10,
    ActivityTimeout = 11,
    DecisionTimeout = 12,
    WorkflowTimeout = 13,
    DeleteHistoryEvent = 14,
    ActivityRetryTimer = 15,
    WorkflowBackoffTimer = 16,
    HistoryReplication = 17,
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
