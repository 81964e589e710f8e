// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `history-serviced`: boots the in-process Persistence Capability, wires it
//! to the replicator core, and serves both a minimal JSON transport over
//! [`Service`] and a Prometheus scrape endpoint. A production wire transport
//! (gRPC framing, RPC dispatch, §1 out of scope) would replace this JSON
//! surface wholesale; what it plugs into — [`Service`]'s one-method-per-
//! protocol-message shape — would stay the same.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use history_core::clock::SystemClock;
use history_replicator::cache::ExecutionCache;
use history_replicator::resources::Resources;
use history_replicator::HistoryReplicator;
use history_service::{Config, Metrics, ReplicationWorker, Service};
use history_storage::cluster_metadata::StaticClusterMetadata;
use history_storage::memory::{InMemoryExecutionStore, InMemoryHistoryStore, InMemoryNamespaceCache, InMemoryShardStore};
use history_wire::error::WireError;
use history_wire::messages::{ReplicateEventsRequest, ReplicateEventsV2Request, SyncActivityRequest};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type AppState = Service<SystemClock>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = Config::from_env();
    tracing::info!(
        cluster = %config.current_cluster_name,
        num_shards = config.num_shards,
        global_namespace = config.global_namespace_enabled,
        "history-serviced starting"
    );

    let cluster_metadata = Arc::new(StaticClusterMetadata::new(
        config.current_cluster_name.clone(),
        config.initial_failover_versions.clone(),
        config.failover_version_increment,
        config.global_namespace_enabled,
    ));
    let resources = Resources::new(
        Arc::new(InMemoryExecutionStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryShardStore::new()),
        Arc::new(InMemoryNamespaceCache::new()),
        cluster_metadata,
        Arc::new(ExecutionCache::new(config.num_shards, config.execution_cache_capacity_per_shard)),
        SystemClock,
    );
    let replicator = Arc::new(HistoryReplicator::new(resources));
    let metrics = Arc::new(Metrics::new());
    let service = Service::new(Arc::clone(&replicator), Arc::clone(&metrics));

    let shutdown = CancellationToken::new();
    let worker = ReplicationWorker::new(Arc::clone(&replicator), Arc::clone(&metrics), config.owned_shard_ids(), config.replication_poll_interval, config.replication_poll_batch_size);
    let worker_handle = tokio::spawn(worker.run(shutdown.clone()));

    let app = Router::new()
        .route("/metrics", get(serve_metrics))
        .route("/replicate-events", post(handle_replicate_events))
        .route("/replicate-events-v2", post(handle_replicate_events_v2))
        .route("/sync-activity", post(handle_sync_activity))
        .with_state((service, metrics));

    let bind_addr = config.metrics_addr.clone();
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %bind_addr, error = %err, "failed to bind listener");
            shutdown.cancel();
            let _ = worker_handle.await;
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %bind_addr, "history-serviced listening");

    let serve_shutdown = shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move { serve_shutdown.cancelled().await });

    tokio::select! {
        result = server => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
            shutdown.cancel();
        }
    }

    shutdown.cancel();
    let _ = worker_handle.await;
    tracing::info!("history-serviced stopped");
}

async fn serve_metrics(State((_service, metrics)): State<(AppState, Arc<Metrics>)>) -> String {
    metrics.render()
}

async fn handle_replicate_events(State((service, _metrics)): State<(AppState, Arc<Metrics>)>, Json(request): Json<ReplicateEventsRequest>) -> Response {
    let cancel = CancellationToken::new();
    to_response(service.replicate_events(&cancel, request).await)
}

async fn handle_replicate_events_v2(State((service, _metrics)): State<(AppState, Arc<Metrics>)>, Json(request): Json<ReplicateEventsV2Request>) -> Response {
    let cancel = CancellationToken::new();
    to_response(service.replicate_events_v2(&cancel, request).await)
}

async fn handle_sync_activity(State((service, _metrics)): State<(AppState, Arc<Metrics>)>, Json(request): Json<SyncActivityRequest>) -> Response {
    let cancel = CancellationToken::new();
    to_response(service.sync_activity(&cancel, request).await)
}

/// Maps a core result onto the wire error taxonomy (§6, §7) and an HTTP
/// status a caller can act on without inspecting the body: retriable
/// conditions as 409 (resend per the carried hint), protocol conflicts as
/// 422 (escalate, don't retry), everything else as 500.
fn to_response(result: history_core::ReplicatorResult<()>) -> Response {
    match result {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            let wire_err: WireError = err.into();
            let status = match &wire_err {
                WireError::RetryTask(_) | WireError::ConditionFailed | WireError::ShardOwnershipLost => StatusCode::CONFLICT,
                WireError::MoreThan2DC | WireError::ImpossibleRemoteClaimSeenHigherVersion | WireError::CorruptedReplicationInfo => StatusCode::UNPROCESSABLE_ENTITY,
                WireError::NotFound => StatusCode::NOT_FOUND,
                WireError::AlreadyExists => StatusCode::CONFLICT,
                WireError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                WireError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(wire_err)).into_response()
        }
    }
}
