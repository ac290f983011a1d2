use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};

use super::protocol::{DumpView, ItemView, TopicView, UpdateRequest, UpdateView};
use crate::cache::CacheNotifier;
use crate::replication::coordinator::ReplicaCoordinator;
use crate::replication::error::ReplicationError;
use crate::store::books::{BookPatch, BookStore};

pub fn routes() -> Router {
    Router::new()
        .route("/query/item/{id}", get(handle_query_item))
        .route("/query/topic/{topic}", get(handle_query_topic))
        .route("/update/{id}", put(handle_update))
        .route("/dump/", get(handle_dump))
}

/// `GET /query/item/{id}`: read through the coordinator so the answer is
/// never staler than what the replica set can prove.
pub async fn handle_query_item(
    Path(id): Path<u32>,
    Extension(coordinator): Extension<Arc<ReplicaCoordinator>>,
) -> Response {
    match coordinator.get(id, None, &[]).await {
        Ok(book) => (StatusCode::OK, Json(ItemView::from(&book))).into_response(),
        Err(error) => {
            tracing::debug!(id, %error, "item query failed");
            not_found()
        }
    }
}

/// `GET /query/topic/{topic}`: topic listings cannot be edited by end
/// users, so they are served from the local store without a peer round.
pub async fn handle_query_topic(
    Path(topic): Path<String>,
    Extension(store): Extension<Arc<BookStore>>,
) -> Response {
    let matches = store.search(&topic);
    if matches.is_empty() {
        return not_found();
    }
    let views: Vec<TopicView> = matches.iter().map(TopicView::from).collect();
    (StatusCode::OK, Json(views)).into_response()
}

/// `PUT /update/{id}`: the conditional write entry point. A `409` tells
/// the caller its view was stale and it must re-read and retry.
pub async fn handle_update(
    Path(id): Path<u32>,
    Extension(coordinator): Extension<Arc<ReplicaCoordinator>>,
    Extension(notifier): Extension<Arc<CacheNotifier>>,
    Json(request): Json<UpdateRequest>,
) -> Response {
    let patch = BookPatch {
        quantity: request.quantity,
        price: request.price,
        ..Default::default()
    };

    match coordinator.update(id, &patch).await {
        Ok(book) => {
            notifier.invalidate_item(id);
            notifier.invalidate_topic(&book.topic);
            (StatusCode::OK, Json(UpdateView::from(&book))).into_response()
        }
        Err(ReplicationError::Outdated(_)) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "message": "Update could not be processed because the item is not up to date"
            })),
        )
            .into_response(),
        Err(error) => {
            tracing::debug!(id, %error, "update failed");
            not_found()
        }
    }
}

/// `GET /dump/`: every record with every field, for diagnostics.
pub async fn handle_dump(Extension(store): Extension<Arc<BookStore>>) -> Response {
    let views: Vec<DumpView> = store.dump().iter().map(DumpView::from).collect();
    (StatusCode::OK, Json(views)).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"message": "Not found"})),
    )
        .into_response()
}
