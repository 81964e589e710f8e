// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{StorageError, StorageResult};
use crate::shard_store::{DlqMessage, Page, PageToken, ReplicationTask, ShardInfo, ShardStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct ShardData {
    info: ShardInfo,
    replication_queue: Vec<ReplicationTask>,
    dlq: Vec<DlqMessage>,
}

#[derive(Default)]
pub struct InMemoryShardStore {
    shards: Mutex<HashMap<u32, ShardData>>,
}

impl InMemoryShardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T: Clone>(items: &[T], last_seen_index: usize, max_count: usize) -> Page<T>
where
    T: HasIndex,
{
    let start = items.iter().position(|item| item.index() > last_seen_index as i64).unwrap_or(items.len());
    let slice = &items[start..];
    let taken: Vec<T> = slice.iter().take(max_count).cloned().collect();
    let next_page_token = if taken.len() < slice.len() { taken.last().map(|t| t.index() as PageToken) } else { None };
    Page { items: taken, next_page_token }
}

trait HasIndex {
    fn index(&self) -> i64;
}

impl HasIndex for ReplicationTask {
    fn index(&self) -> i64 {
        self.task_id
    }
}

impl HasIndex for DlqMessage {
    fn index(&self) -> i64 {
        self.task.task_id
    }
}

#[async_trait]
impl ShardStore for InMemoryShardStore {
    async fn get_shard(&self, shard_id: u32) -> StorageResult<ShardInfo> {
        let shards = self.shards.lock();
        Ok(shards.get(&shard_id).map(|d| d.info.clone()).unwrap_or(ShardInfo { shard_id, ..Default::default() }))
    }

    async fn update_shard(&self, shard_id: u32, expected_range_id: i64, updated: ShardInfo) -> StorageResult<()> {
        let mut shards = self.shards.lock();
        let entry = shards.entry(shard_id).or_default();
        if entry.info.range_id != expected_range_id {
            return Err(StorageError::ShardOwnershipLost { shard_id });
        }
        entry.info = updated;
        Ok(())
    }

    async fn sync_shard_status(&self, shard_id: u32, cluster: &str, ack_level: i64) -> StorageResult<()> {
        let mut shards = self.shards.lock();
        let entry = shards.entry(shard_id).or_default();
        entry.info.shard_id = shard_id;
        let current = entry.info.cluster_transfer_ack_level.entry(cluster.to_string()).or_insert(0);
        if ack_level > *current {
            *current = ack_level;
        }
        Ok(())
    }

    async fn enqueue_replication_task(&self, shard_id: u32, task: ReplicationTask) -> StorageResult<()> {
        let mut shards = self.shards.lock();
        shards.entry(shard_id).or_default().replication_queue.push(task);
        Ok(())
    }

    async fn get_replication_messages(&self, shard_id: u32, last_read_task_id: i64, max_count: usize) -> StorageResult<Page<ReplicationTask>> {
        let shards = self.shards.lock();
        let queue = shards.get(&shard_id).map(|d| d.replication_queue.as_slice()).unwrap_or(&[]);
        Ok(page_of(queue, last_read_task_id as usize, max_count))
    }

    async fn move_to_dlq(&self, shard_id: u32, message: DlqMessage) -> StorageResult<()> {
        let mut shards = self.shards.lock();
        shards.entry(shard_id).or_default().dlq.push(message);
        Ok(())
    }

    async fn get_dlq_messages(&self, shard_id: u32, page_token: Option<PageToken>, max_count: usize) -> StorageResult<Page<DlqMessage>> {
        let shards = self.shards.lock();
        let dlq = shards.get(&shard_id).map(|d| d.dlq.as_slice()).unwrap_or(&[]);
        Ok(page_of(dlq, page_token.unwrap_or(0) as usize, max_count))
    }

    async fn purge_dlq_messages(&self, shard_id: u32, inclusive_task_id: i64) -> StorageResult<()> {
        let mut shards = self.shards.lock();
        if let Some(data) = shards.get_mut(&shard_id) {
            data.dlq.retain(|m| m.task.task_id > inclusive_task_id);
        }
        Ok(())
    }

    async fn merge_dlq_messages(&self, shard_id: u32, task_ids: &[i64]) -> StorageResult<Page<DlqMessage>> {
        let mut shards = self.shards.lock();
        let data = shards.entry(shard_id).or_default();
        let (to_merge, remaining): (Vec<_>, Vec<_>) = data.dlq.drain(..).partition(|m| task_ids.contains(&m.task.task_id));
        data.dlq = remaining;
        for message in &to_merge {
            data.replication_queue.push(message.task.clone());
        }
        Ok(Page { items: to_merge, next_page_token: None })
    }
}

#[cfg(test)]
#[path = "shard_tests.rs"]
mod tests;
