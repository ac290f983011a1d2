//! Catalog Response Schemas
//!
//! Each public endpoint exposes a fixed projection of the record, mirroring
//! what its consumers are allowed to see. The dump view is the only one
//! that includes the sequence number.

use serde::{Deserialize, Serialize};

use crate::store::books::Book;

/// `GET /query/item/{id}` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemView {
    pub title: String,
    pub quantity: u32,
    pub price: f64,
}

impl From<&Book> for ItemView {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            quantity: book.quantity,
            price: book.price,
        }
    }
}

/// One element of a `GET /query/topic/{topic}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicView {
    pub id: u32,
    pub title: String,
    pub topic: String,
}

impl From<&Book> for TopicView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            topic: book.topic.clone(),
        }
    }
}

/// `PUT /update/{id}` request body. Only stock and price are writable
/// through the public surface.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// `PUT /update/{id}` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateView {
    pub title: String,
    pub quantity: u32,
    pub topic: String,
    pub price: f64,
}

impl From<&Book> for UpdateView {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            quantity: book.quantity,
            topic: book.topic.clone(),
            price: book.price,
        }
    }
}

/// One element of the `GET /dump/` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct DumpView {
    pub id: u32,
    pub sequence_number: u64,
    pub title: String,
    pub quantity: u32,
    pub topic: String,
    pub price: f64,
}

impl From<&Book> for DumpView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            sequence_number: book.sequence_number,
            title: book.title.clone(),
            quantity: book.quantity,
            topic: book.topic.clone(),
            price: book.price,
        }
    }
}
