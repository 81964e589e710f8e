// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{StorageError, StorageResult};
use crate::execution_store::{CreateMode, CurrentExecutionRecord, ExecutionStore};
use async_trait::async_trait;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::mutable_state::WorkflowSnapshot;
use parking_lot::Mutex;
use std::collections::HashMap;

type CurrentKey = (NamespaceId, WorkflowId);
type RunKey = (NamespaceId, WorkflowId, RunId);

#[derive(Default)]
struct Inner {
    current: HashMap<CurrentKey, CurrentExecutionRecord>,
    runs: HashMap<RunKey, WorkflowSnapshot>,
}

/// Default, in-process `ExecutionStore`. Enforces invariant 5 (at most one
/// run in `{Created, Running}` per workflow ID) and the `update_condition`
/// fence (invariant 6) under a single process-wide lock — correct, not
/// scalable, which is the tradeoff a real persistence engine being out of
/// scope implies.
#[derive(Default)]
pub struct InMemoryExecutionStore {
    inner: Mutex<Inner>,
}

impl InMemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn current_record(snapshot: &WorkflowSnapshot) -> CurrentExecutionRecord {
    CurrentExecutionRecord {
        run_id: snapshot.execution_info.run_id,
        state: snapshot.execution_info.state,
        last_write_version: snapshot.replication_state.last_write_version,
        next_event_id: snapshot.execution_info.next_event_id,
        last_event_task_id: snapshot.execution_info.last_event_task_id,
    }
}

#[async_trait]
impl ExecutionStore for InMemoryExecutionStore {
    async fn get_current_execution(&self, namespace_id: NamespaceId, workflow_id: &WorkflowId) -> StorageResult<CurrentExecutionRecord> {
        let inner = self.inner.lock();
        inner
            .current
            .get(&(namespace_id, workflow_id.clone()))
            .copied()
            .ok_or_else(|| StorageError::NotFound { namespace_id, workflow_id: workflow_id.clone() })
    }

    async fn get_workflow_execution(&self, namespace_id: NamespaceId, workflow_id: &WorkflowId, run_id: RunId) -> StorageResult<WorkflowSnapshot> {
        let inner = self.inner.lock();
        inner
            .runs
            .get(&(namespace_id, workflow_id.clone(), run_id))
            .cloned()
            .ok_or_else(|| StorageError::NotFound { namespace_id, workflow_id: workflow_id.clone() })
    }

    async fn create_workflow_execution(&self, workflow_id: &WorkflowId, mode: CreateMode, snapshot: WorkflowSnapshot) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        let current_key = (snapshot.namespace_id, workflow_id.clone());

        match (&mode, inner.current.get(&current_key).copied()) {
            (CreateMode::BrandNew, Some(existing)) => {
                return Err(StorageError::AlreadyStarted {
                    namespace_id: snapshot.namespace_id,
                    workflow_id: workflow_id.clone(),
                    current_run_id: existing.run_id,
                    current_state: existing.state,
                    current_last_write_version: existing.last_write_version,
                    current_next_event_id: existing.next_event_id,
                    current_last_event_task_id: existing.last_event_task_id,
                });
            }
            (CreateMode::BrandNew, None) => {}
            (CreateMode::WorkflowIdReuse { previous_run_id, previous_last_write_version }, Some(existing)) => {
                if existing.run_id != *previous_run_id || existing.last_write_version != *previous_last_write_version {
                    return Err(StorageError::AlreadyStarted {
                        namespace_id: snapshot.namespace_id,
                        workflow_id: workflow_id.clone(),
                        current_run_id: existing.run_id,
                        current_state: existing.state,
                        current_last_write_version: existing.last_write_version,
                        current_next_event_id: existing.next_event_id,
                        current_last_event_task_id: existing.last_event_task_id,
                    });
                }
            }
            (CreateMode::WorkflowIdReuse { .. }, None) => {
                return Err(StorageError::NotFound { namespace_id: snapshot.namespace_id, workflow_id: workflow_id.clone() });
            }
        }

        inner.current.insert(current_key, current_record(&snapshot));
        let run_key = (snapshot.namespace_id, workflow_id.clone(), snapshot.execution_info.run_id);
        inner.runs.insert(run_key, snapshot);
        Ok(())
    }

    async fn update_workflow_execution(&self, workflow_id: &WorkflowId, snapshot: WorkflowSnapshot) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        let run_key = (snapshot.namespace_id, workflow_id.clone(), snapshot.execution_info.run_id);

        let expected = snapshot.update_condition - 1;
        let actual = inner.runs.get(&run_key).map(|s| s.update_condition).unwrap_or(0);
        if actual != expected {
            return Err(StorageError::ConditionFailed { expected, actual });
        }

        let current_key = (snapshot.namespace_id, workflow_id.clone());
        if inner.current.get(&current_key).map(|r| r.run_id) == Some(snapshot.execution_info.run_id) {
            inner.current.insert(current_key, current_record(&snapshot));
        }
        inner.runs.insert(run_key, snapshot);
        Ok(())
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
