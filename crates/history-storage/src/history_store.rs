// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Persistence Capability's history-node operations (§2, §6).

use crate::error::StorageResult;
use async_trait::async_trait;
use history_core::events::HistoryEvent;

/// Opaque handle to a run's current branch of history-node storage. Treated
/// as an uninterpreted byte string by everything except the store itself,
/// matching `ExecutionInfo::branch_token`.
pub type BranchToken = Vec<u8>;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `events` under `branch_token`. Called both for events
    /// originated locally and events replicated from a peer — the store
    /// does not distinguish.
    async fn append_history_nodes(&self, branch_token: &BranchToken, shard_id: u32, events: &[HistoryEvent]) -> StorageResult<()>;

    /// Delete an entire branch, used to clean up after a rejected
    /// start-event replication (§4.4 reject paths).
    async fn delete_history_branch(&self, branch_token: &BranchToken, shard_id: u32) -> StorageResult<()>;

    /// Read events on `branch_token` up to and including `up_to_event_id`,
    /// used by the conflict resolver (§4.9) to replay a run back to a cut
    /// point.
    async fn read_history(&self, branch_token: &BranchToken, up_to_event_id: i64) -> StorageResult<Vec<HistoryEvent>>;
}
