// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::identity::{NamespaceId, RunId, WorkflowId};

#[test]
fn retry_buffer_events_carries_run_id_and_next_event_id() {
    let err = ReplicatorError::RetryBufferEvents {
        namespace_id: NamespaceId::new(),
        workflow_id: WorkflowId::new("w"),
        run_id: RunId::new(),
        next_event_id: 55,
    };
    let wire: WireError = err.into();
    match wire {
        WireError::RetryTask(retry) => assert_eq!(retry.next_event_id, 55),
        other => panic!("expected RetryTask, got {other:?}"),
    }
}

#[test]
fn retry_workflow_not_found_has_no_run_id() {
    let err = ReplicatorError::RetryWorkflowNotFound { namespace_id: NamespaceId::new(), workflow_id: WorkflowId::new("w"), next_event_id: 1 };
    let wire: WireError = err.into();
    match wire {
        WireError::RetryTask(retry) => assert!(retry.run_id.is_none()),
        other => panic!("expected RetryTask, got {other:?}"),
    }
}

#[test]
fn conflict_variants_map_to_their_named_wire_errors() {
    assert_eq!(
        WireError::from(ReplicatorError::MoreThan2DC { namespace_id: NamespaceId::new(), workflow_id: WorkflowId::new("w") }),
        WireError::MoreThan2DC
    );
    assert_eq!(
        WireError::from(ReplicatorError::CorruptedReplicationInfo {
            namespace_id: NamespaceId::new(),
            workflow_id: WorkflowId::new("w"),
            run_id: RunId::new(),
        }),
        WireError::CorruptedReplicationInfo
    );
}

#[test]
fn internal_error_message_is_preserved() {
    let wire: WireError = ReplicatorError::Internal("boom".to_string()).into();
    assert_eq!(wire, WireError::Internal("boom".to_string()));
}
