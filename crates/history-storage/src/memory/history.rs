// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{StorageError, StorageResult};
use crate::history_store::{BranchToken, HistoryStore};
use async_trait::async_trait;
use history_core::events::HistoryEvent;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryHistoryStore {
    branches: Mutex<HashMap<BranchToken, Vec<HistoryEvent>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append_history_nodes(&self, branch_token: &BranchToken, _shard_id: u32, events: &[HistoryEvent]) -> StorageResult<()> {
        let mut branches = self.branches.lock();
        branches.entry(branch_token.clone()).or_default().extend_from_slice(events);
        Ok(())
    }

    async fn delete_history_branch(&self, branch_token: &BranchToken, _shard_id: u32) -> StorageResult<()> {
        self.branches.lock().remove(branch_token);
        Ok(())
    }

    async fn read_history(&self, branch_token: &BranchToken, up_to_event_id: i64) -> StorageResult<Vec<HistoryEvent>> {
        let branches = self.branches.lock();
        let events = branches.get(branch_token).ok_or(StorageError::BranchNotFound)?;
        Ok(events.iter().filter(|e| e.event_id <= up_to_event_id).cloned().collect())
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
