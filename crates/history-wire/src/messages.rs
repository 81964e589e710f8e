// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol messages (§6): the field-numbered payloads the History service
//! accepts and emits. Field numbering itself is a transport concern (out of
//! scope, §1); what's preserved here is the shape and naming those fields
//! would carry.

use history_core::events::HistoryEvent;
use history_core::identity::{NamespaceId, WorkflowExecution};
use history_core::replication_state::ReplicationInfo;
use history_core::version_history::VersionHistoryItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `ReplicateEventsRequest` (§6). The v1 wire shape: per-cluster
/// replication info rather than explicit version histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateEventsRequest {
    pub source_cluster: String,
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
    pub first_event_id: i64,
    pub next_event_id: i64,
    pub version: i64,
    pub replication_info: HashMap<String, ReplicationInfo>,
    pub history: Vec<HistoryEvent>,
    #[serde(default)]
    pub new_run_history: Option<Vec<HistoryEvent>>,
    #[serde(default)]
    pub event_store_version: i32,
    #[serde(default)]
    pub reset_workflow: bool,
    #[serde(default)]
    pub new_run_ndc: bool,
    /// Deprecated on the protocol but still consulted for closed workflows:
    /// preserved for wire compatibility and never set by this crate when
    /// emitting a request.
    #[serde(default)]
    pub force_buffer_events: bool,
}

/// `ReplicateEventsV2Request` (§6). The v2 wire shape: explicit version
/// history items instead of per-cluster replication info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateEventsV2Request {
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
    pub version_history_items: Vec<VersionHistoryItem>,
    pub events: Vec<HistoryEvent>,
    #[serde(default)]
    pub new_run_events: Option<Vec<HistoryEvent>>,
}

/// `ReplicateRawEventsRequest`: the compressed-blob variant (§4.2). Carries
/// the same fields as v1 but with `history`/`new_run_history` encoded as
/// opaque bytes; semantics after decoding are identical to
/// [`ReplicateEventsRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateRawEventsRequest {
    pub source_cluster: String,
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
    pub first_event_id: i64,
    pub next_event_id: i64,
    pub version: i64,
    pub replication_info: HashMap<String, ReplicationInfo>,
    pub events: Vec<u8>,
    #[serde(default)]
    pub new_run_events: Option<Vec<u8>>,
    #[serde(default)]
    pub reset_workflow: bool,
}

/// `SyncActivityRequest` (§6). Synchronizes one activity's live state
/// without replaying its events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncActivityRequest {
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
    pub version: i64,
    pub scheduled_id: i64,
    pub scheduled_time_ms: u64,
    pub started_id: i64,
    pub started_time_ms: Option<u64>,
    pub last_heartbeat_time_ms: u64,
    pub details: Vec<u8>,
    pub attempt: i32,
    pub last_failure: Option<String>,
    pub last_worker_identity: String,
    pub version_history: Option<Vec<VersionHistoryItem>>,
}

/// `SyncShardStatusRequest` (§6): peer liveness/ack signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncShardStatusRequest {
    pub source_cluster: String,
    pub shard_id: u32,
    pub timestamp_ms: u64,
}

/// One shard's replication-read cursor, the unit `GetReplicationMessages`
/// takes one of per requested shard (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationToken {
    pub shard_id: u32,
    pub last_processed_message_id: i64,
    pub last_retrieved_message_id: i64,
    pub cluster_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetReplicationMessagesRequest {
    pub tokens: Vec<ReplicationToken>,
    pub cluster_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationMessages {
    pub tasks: Vec<HistoryEvent>,
    pub last_retrieved_message_id: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DlqTokenKind {
    Replication,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadDlqMessagesRequest {
    pub dlq_type: DlqTokenKind,
    pub shard_id: u32,
    pub source_cluster: String,
    pub inclusive_end_message_id: Option<i64>,
    pub maximum_page_size: i32,
    pub next_page_token: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeDlqMessagesRequest {
    pub dlq_type: DlqTokenKind,
    pub shard_id: u32,
    pub source_cluster: String,
    pub inclusive_end_message_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDlqMessagesRequest {
    pub dlq_type: DlqTokenKind,
    pub shard_id: u32,
    pub source_cluster: String,
    pub message_ids: Vec<i64>,
}

/// Mirrors `ReadDlqMessagesRequest` for the replication-message DLQ
/// specifically, named separately in §4.2's auxiliary operation list.
pub type GetDlqReplicationMessagesRequest = ReadDlqMessagesRequest;

/// `ReapplyEvents` (§4.2 auxiliary): replays the signal events in `events`
/// against the named workflow via the signal-reapplication pipeline (§4.8),
/// independent of any ingestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReapplyEventsRequest {
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
    pub events: Vec<HistoryEvent>,
}

/// `RefreshWorkflowTasks` (§4.2 auxiliary): re-derives the transfer/timer
/// tasks for a run's current mutable state without mutating history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshWorkflowTasksRequest {
    pub namespace_id: NamespaceId,
    pub workflow_execution: WorkflowExecution,
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
