// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow and run identity.
//!
//! A workflow is identified by `(namespace_id, workflow_id)`. A concrete
//! attempt at running it is a *run*, identified additionally by `run_id`.
//! At most one run per workflow is the "current" run at any time (see
//! [`crate::execution_info::ExecutionState`]).

use std::fmt;
use uuid::Uuid;

/// Identifies a namespace (a tenant/environment partition of the cluster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(pub Uuid);

impl NamespaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for NamespaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a run. Unlike [`NamespaceId`] this is always server-generated:
/// peer clusters replicate the same run ID for the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Lexicographic ordering over the string form, used by the execution
    /// cache to pick a deterministic lock-acquisition order across two runs
    /// of the same workflow (deadlock avoidance).
    pub fn lock_order_key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-assigned workflow identifier. Arbitrary non-empty string, reused
/// across runs of "the same" workflow (workflow-id-reuse, see the start-event
/// replication procedure).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkflowId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WorkflowId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The pair that names a concrete run: the user-facing workflow ID plus the
/// server-assigned run ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct WorkflowExecution {
    pub workflow_id: WorkflowId,
    pub run_id: RunId,
}

impl WorkflowExecution {
    pub fn new(workflow_id: impl Into<WorkflowId>, run_id: RunId) -> Self {
        Self { workflow_id: workflow_id.into(), run_id }
    }
}

impl fmt::Display for WorkflowExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workflow_id, self.run_id)
    }
}

/// A fully-qualified key into the execution cache / persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionKey {
    pub namespace_id: NamespaceId,
    pub workflow_id: WorkflowId,
    pub run_id: RunId,
}

impl ExecutionKey {
    pub fn new(namespace_id: NamespaceId, workflow_id: impl Into<WorkflowId>, run_id: RunId) -> Self {
        Self { namespace_id, workflow_id: workflow_id.into(), run_id }
    }
}

impl fmt::Display for ExecutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace_id, self.workflow_id, self.run_id)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
