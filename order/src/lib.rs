//! Order Service Library
//!
//! One endpoint: `PUT /buy/{id}`. The heavy lifting is the optimistic
//! retry loop in [`purchase`], which cooperates with the catalog's
//! stale-write conflict signal.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::put;
use axum::{Extension, Json, Router};
use serde_json::Value;

pub mod purchase;

use purchase::PurchaseClient;

pub fn router(client: Arc<PurchaseClient>) -> Router {
    Router::new()
        .route("/buy/{id}", put(handle_buy))
        .layer(Extension(client))
}

pub async fn handle_buy(
    Path(book_id): Path<String>,
    Extension(client): Extension<Arc<PurchaseClient>>,
) -> (StatusCode, Json<Value>) {
    let (status, body) = client.purchase(&book_id).await;
    (status, Json(body))
}
