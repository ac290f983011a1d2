//! Purchase Coordinator
//!
//! Optimistic concurrency control on top of the catalog's conflict signal:
//! read the item, decide, write the decrement, and start over from a fresh
//! read whenever the catalog answers `409` (the view was stale). Nothing in
//! here raises to the caller; every failure becomes a response payload.

use std::time::Duration;

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

/// Retry budget for the read-decide-write cycle. Conflicts beyond this are
/// reported back to the client instead of spinning under contention.
pub const MAX_PURCHASE_ATTEMPTS: usize = 16;

/// Connection-establishment budget per catalog call.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(150);
/// Total round-trip budget per catalog call.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(1500);

/// The slice of the item view the purchase decision needs.
#[derive(Debug, Deserialize)]
struct ItemSnapshot {
    quantity: u32,
}

pub struct PurchaseClient {
    catalog_address: String,
    client: reqwest::Client,
    max_attempts: usize,
}

impl PurchaseClient {
    pub fn new(catalog_address: String) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("http client construction");
        Self {
            catalog_address: catalog_address.trim_end_matches('/').to_string(),
            client,
            max_attempts: MAX_PURCHASE_ATTEMPTS,
        }
    }

    /// Attempts to buy one unit of `book_id`.
    ///
    /// Returns the HTTP status and body the order endpoint should answer
    /// with; catalog failures other than not-found and conflict pass
    /// through verbatim.
    pub async fn purchase(&self, book_id: &str) -> (StatusCode, Value) {
        if book_id.is_empty() || !book_id.chars().all(|c| c.is_ascii_digit()) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"message": "Book ID must be a number"}),
            );
        }

        for attempt in 0..self.max_attempts {
            let response = match self
                .client
                .get(format!("{}/query/item/{}", self.catalog_address, book_id))
                .send()
                .await
            {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(book_id, %error, "catalog unreachable during query");
                    return could_not_connect();
                }
            };

            let status = convert_status(response.status());
            match status {
                StatusCode::NOT_FOUND => {
                    return (
                        StatusCode::NOT_FOUND,
                        json!({"message": "Book with the specified ID does not exist"}),
                    );
                }
                StatusCode::OK => {}
                other => return (other, body_of(response).await),
            }

            let item: ItemSnapshot = match response.json().await {
                Ok(item) => item,
                Err(error) => {
                    tracing::warn!(book_id, %error, "undecodable item view from catalog");
                    return could_not_connect();
                }
            };

            if item.quantity == 0 {
                return (
                    StatusCode::OK,
                    json!({
                        "success": false,
                        "message": "Book with the specified ID is out of stock"
                    }),
                );
            }

            let write = match self
                .client
                .put(format!("{}/update/{}", self.catalog_address, book_id))
                .json(&json!({"quantity": item.quantity - 1}))
                .send()
                .await
            {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(book_id, %error, "catalog unreachable during update");
                    return could_not_connect();
                }
            };

            match convert_status(write.status()) {
                // Stale view: discard the attempt and re-read.
                StatusCode::CONFLICT => {
                    tracing::debug!(book_id, attempt, "purchase raced a newer version, retrying");
                    continue;
                }
                StatusCode::OK => {
                    return (
                        StatusCode::OK,
                        json!({
                            "success": true,
                            "message": "Book with the specified ID purchased"
                        }),
                    );
                }
                other => return (other, body_of(write).await),
            }
        }

        (
            StatusCode::CONFLICT,
            json!({
                "success": false,
                "message": "Purchase abandoned after too many conflicting updates"
            }),
        )
    }
}

fn could_not_connect() -> (StatusCode, Value) {
    (
        StatusCode::GATEWAY_TIMEOUT,
        json!({"message": "Could not connect to the catalog server"}),
    )
}

async fn body_of(response: reqwest::Response) -> Value {
    response.json().await.unwrap_or_else(|_| json!({}))
}

fn convert_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}
