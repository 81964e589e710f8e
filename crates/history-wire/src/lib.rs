// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! history-wire: the transport-agnostic protocol surface (§4.2, §6) —
//! request/response payloads for the History service's replication and DLQ
//! operations, and the protocol-stable task numbering they reference.
//!
//! These types carry `history_core` domain types directly rather than
//! opaque blobs: the actual wire transport (gRPC/Thrift framing) is out of
//! scope (§1), so this crate stops at "the typed shape a transport would
//! serialize", matching how `history-core`'s own types already derive
//! `Serialize`/`Deserialize`.

pub mod error;
pub mod messages;
pub mod task;

pub use error::WireError;
pub use messages::{
    DlqTokenKind, GetDlqReplicationMessagesRequest, GetReplicationMessagesRequest, MergeDlqMessagesRequest, PurgeDlqMessagesRequest,
    ReadDlqMessagesRequest, ReapplyEventsRequest, RefreshWorkflowTasksRequest, ReplicateEventsRequest, ReplicateEventsV2Request,
    ReplicateRawEventsRequest, ReplicationMessages, ReplicationToken, SyncActivityRequest, SyncShardStatusRequest,
};
pub use task::{TaskCategory, TaskType};
