// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-mostly namespace metadata (§6): the replication config and
//! failover version a namespace was last known to carry.

use crate::error::StorageResult;
use async_trait::async_trait;
use history_core::identity::NamespaceId;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplicationConfig {
    pub active_cluster_name: String,
    pub clusters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NamespaceInfo {
    pub namespace_id: NamespaceId,
    pub name: String,
    pub replication_config: ReplicationConfig,
    pub failover_version: i64,
    pub is_global_namespace: bool,
}

#[async_trait]
pub trait NamespaceCache: Send + Sync {
    async fn get_namespace_by_id(&self, namespace_id: NamespaceId) -> StorageResult<NamespaceInfo>;

    async fn get_namespace_by_name(&self, name: &str) -> StorageResult<NamespaceInfo>;
}
