// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{StorageError, StorageResult};
use crate::namespace_cache::{NamespaceCache, NamespaceInfo};
use async_trait::async_trait;
use history_core::identity::NamespaceId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A statically-seeded `NamespaceCache`. Real deployments refresh this from
/// a control-plane metadata store on a background poll; that refresh loop is
/// out of scope here, so callers seed it up front via [`Self::seed`].
#[derive(Default)]
pub struct InMemoryNamespaceCache {
    by_id: RwLock<HashMap<NamespaceId, NamespaceInfo>>,
}

impl InMemoryNamespaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, info: NamespaceInfo) {
        self.by_id.write().insert(info.namespace_id, info);
    }
}

#[async_trait]
impl NamespaceCache for InMemoryNamespaceCache {
    async fn get_namespace_by_id(&self, namespace_id: NamespaceId) -> StorageResult<NamespaceInfo> {
        self.by_id.read().get(&namespace_id).cloned().ok_or(StorageError::Internal(format!("unknown namespace {namespace_id}")))
    }

    async fn get_namespace_by_name(&self, name: &str) -> StorageResult<NamespaceInfo> {
        self.by_id
            .read()
            .values()
            .find(|info| info.name == name)
            .cloned()
            .ok_or_else(|| StorageError::Internal(format!("unknown namespace {name}")))
    }
}

#[cfg(test)]
#[path = "namespace_tests.rs"]
mod tests;
