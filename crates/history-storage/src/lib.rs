// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! history-storage: the Persistence Capability — execution rows, history
//! nodes, shard bookkeeping, and namespace/cluster metadata the replicator
//! reads and writes through trait boundaries, plus the in-process
//! implementations that back them.

pub mod cluster_metadata;
pub mod error;
pub mod execution_store;
pub mod history_store;
pub mod memory;
pub mod namespace_cache;
pub mod shard_store;

pub use cluster_metadata::StaticClusterMetadata;
pub use error::{StorageError, StorageResult};
pub use execution_store::{CreateMode, CurrentExecutionRecord, ExecutionStore};
pub use history_store::{BranchToken, HistoryStore};
pub use namespace_cache::{NamespaceCache, NamespaceInfo, ReplicationConfig};
pub use shard_store::{DlqMessage, Page, PageToken, ReplicationTask, ShardInfo, ShardStore};
