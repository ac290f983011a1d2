//! Peer RPC Handlers
//!
//! Server side of the `/rep` surface. `check` and `update` run directly
//! against the local store; `get` re-enters the coordinator one hop deeper,
//! extending the visited set so the chain cannot revisit a node.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};

use super::coordinator::{ReplicaCoordinator, contains_address};
use super::error::ReplicationError;
use super::protocol::{CheckRequest, ReplicaRecord, SyncGetRequest, SyncUpdateRequest};
use crate::store::books::BookStore;

pub fn routes() -> Router {
    Router::new()
        .route("/rep/check/{id}", get(handle_check))
        .route("/rep/update/{id}", put(handle_sync_update))
        .route("/rep/get/{id}", get(handle_sync_get))
}

/// `GET /rep/check/{id}`: conflict with the full local record when this
/// node holds something newer than the caller's baseline, empty success
/// otherwise.
pub async fn handle_check(
    Path(id): Path<u32>,
    Extension(store): Extension<Arc<BookStore>>,
    Json(request): Json<CheckRequest>,
) -> Response {
    match store.get(id) {
        Some(book) if book.sequence_number > request.sequence_number => {
            (StatusCode::CONFLICT, Json(ReplicaRecord::from(&book))).into_response()
        }
        Some(_) => (StatusCode::OK, Json(serde_json::json!({}))).into_response(),
        None => not_found(),
    }
}

/// `PUT /rep/update/{id}`: reject with the local record when it is newer
/// than the sender's baseline; otherwise apply the fields, advance the
/// clock to exactly baseline + 1, and answer with the pre-update snapshot.
pub async fn handle_sync_update(
    Path(id): Path<u32>,
    Extension(store): Extension<Arc<BookStore>>,
    Json(request): Json<SyncUpdateRequest>,
) -> Response {
    let Some(book) = store.get(id) else {
        return not_found();
    };

    if book.sequence_number > request.sequence_number {
        tracing::debug!(
            id,
            ours = book.sequence_number,
            theirs = request.sequence_number,
            "rejecting stale broadcast"
        );
        return (StatusCode::CONFLICT, Json(ReplicaRecord::from(&book))).into_response();
    }

    let snapshot = ReplicaRecord::from(&book);
    store.update(id, &request.into_patch());
    (StatusCode::OK, Json(snapshot)).into_response()
}

/// `GET /rep/get/{id}`: one hop of the read-repair chain, executed against
/// this node's own state and peer view.
pub async fn handle_sync_get(
    Path(id): Path<u32>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Extension(coordinator): Extension<Arc<ReplicaCoordinator>>,
    Json(request): Json<SyncGetRequest>,
) -> Response {
    let mut visited = request.requesters;

    // Any configured peer matching the requester's remote address has by
    // definition been consulted already.
    let remote_ip = remote.ip().to_string();
    for peer in coordinator.peers() {
        if peer.contains(&remote_ip) && !contains_address(&visited, peer) {
            visited.push(peer.clone());
        }
    }

    match coordinator.get(id, Some(request.sequence_number), &visited).await {
        Ok(book) => (StatusCode::OK, Json(ReplicaRecord::from(&book))).into_response(),
        Err(ReplicationError::Outdated(_)) => {
            // Nobody along this chain holds anything as new as the floor.
            (StatusCode::CONFLICT, Json(serde_json::json!({}))).into_response()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"message": "Not found"})),
    )
        .into_response()
}
