// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! history-core: domain model for the cross-cluster workflow history
//! replicator — identity, failover versions, version histories, replication
//! state, execution metadata, history events, and the mutable-state builder
//! that ties them together.

pub mod macros;

pub mod buffered_events;
pub mod clock;
pub mod error;
pub mod events;
pub mod execution_info;
pub mod failover;
pub mod identity;
pub mod mutable_state;
pub mod replication_state;
pub mod state_builder;
pub mod version_history;

pub use buffered_events::BufferedEvents;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ReplicatorError, ReplicatorResult};
pub use events::{DecisionTaskFailedCause, HistoryEvent, HistoryEventAttributes};
pub use execution_info::{DecisionInfo, ExecutionInfo, ExecutionState, ParentExecutionInfo, RetryPolicy};
pub use failover::{ClusterMetadata, FailoverVersion};
pub use identity::{ExecutionKey, NamespaceId, RunId, WorkflowExecution, WorkflowId};
pub use mutable_state::{MutableStateBuilder, TransactionPolicy, WorkflowSnapshot};
pub use replication_state::{ReplicationInfo, ReplicationState};
pub use state_builder::{apply_events, GeneratedTask, StateBuilderError};
pub use version_history::{VersionHistories, VersionHistory, VersionHistoryItem};
