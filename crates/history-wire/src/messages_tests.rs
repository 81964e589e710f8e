// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use history_core::identity::{RunId, WorkflowId};

fn execution() -> WorkflowExecution {
    WorkflowExecution::new(WorkflowId::new("w"), RunId::new())
}

#[test]
fn replicate_events_request_round_trips_through_json() {
    let req = ReplicateEventsRequest {
        source_cluster: "cluster-a".to_string(),
        namespace_id: NamespaceId::new(),
        workflow_execution: execution(),
        first_event_id: 1,
        next_event_id: 3,
        version: 100,
        replication_info: HashMap::new(),
        history: vec![],
        new_run_history: None,
        event_store_version: 2,
        reset_workflow: false,
        new_run_ndc: false,
        force_buffer_events: false,
    };
    let json = serde_json::to_string(&req).expect("serialize");
    let back: ReplicateEventsRequest = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, req);
}

#[test]
fn force_buffer_events_defaults_to_false_when_absent_from_wire() {
    let json = r#"{
        "source_cluster": "c",
        "namespace_id": "00000000-0000-0000-0000-000000000000",
        "workflow_execution": {"workflow_id": "w", "run_id": "00000000-0000-0000-0000-000000000000"},
        "first_event_id": 1,
        "next_event_id": 2,
        "version": 1,
        "replication_info": {},
        "history": []
    }"#;
    let req: ReplicateEventsRequest = serde_json::from_str(json).expect("deserialize legacy wire shape");
    assert!(!req.force_buffer_events);
}

#[test]
fn dlq_read_request_round_trips() {
    let req = ReadDlqMessagesRequest {
        dlq_type: DlqTokenKind::Replication,
        shard_id: 7,
        source_cluster: "cluster-b".to_string(),
        inclusive_end_message_id: Some(42),
        maximum_page_size: 100,
        next_page_token: None,
    };
    let json = serde_json::to_string(&req).expect("serialize");
    let back: ReadDlqMessagesRequest = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, req);
}
