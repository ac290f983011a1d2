//! Replication Network Protocol
//!
//! Endpoint constants and DTOs for the peer-facing `/rep` surface. All
//! bodies are JSON; conflict responses use `409 Conflict` and carry the
//! responder's full record where the caller can make use of it.

use serde::{Deserialize, Serialize};

use crate::store::books::{Book, BookPatch};

// --- API Endpoints ---

/// Conflict-check round: "is your copy newer than this sequence number?"
pub const ENDPOINT_CHECK: &str = "/rep/check";
/// Write broadcast: "apply these fields on top of this sequence number."
pub const ENDPOINT_UPDATE: &str = "/rep/update";
/// Read-repair hop: "find me a copy at least this new."
pub const ENDPOINT_GET: &str = "/rep/get";

// --- Data Transfer Objects ---

/// A full record as exchanged between replicas. The id travels in the URL,
/// everything else in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaRecord {
    pub sequence_number: u64,
    pub title: String,
    pub topic: String,
    pub quantity: u32,
    pub price: f64,
}

impl ReplicaRecord {
    /// Patch that adopts this record verbatim, sequence number included.
    pub fn into_patch(self) -> BookPatch {
        BookPatch {
            title: Some(self.title),
            topic: Some(self.topic),
            quantity: Some(self.quantity),
            price: Some(self.price),
            sequence_number: Some(self.sequence_number),
        }
    }
}

impl From<&Book> for ReplicaRecord {
    fn from(book: &Book) -> Self {
        Self {
            sequence_number: book.sequence_number,
            title: book.title.clone(),
            topic: book.topic.clone(),
            quantity: book.quantity,
            price: book.price,
        }
    }
}

/// Body of a conflict-check request.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckRequest {
    /// The caller's write baseline.
    pub sequence_number: u64,
}

/// Body of a broadcast write.
///
/// `sequence_number` is the sender's baseline; the receiver applies the
/// fields and then sets its clock to exactly `sequence_number + 1`, the
/// sender's intended post-write version.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncUpdateRequest {
    pub sequence_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl SyncUpdateRequest {
    pub fn new(sequence_number: u64, patch: &BookPatch) -> Self {
        Self {
            sequence_number,
            title: patch.title.clone(),
            topic: patch.topic.clone(),
            quantity: patch.quantity,
            price: patch.price,
        }
    }

    /// Patch applying the fields with the caller's intended post-write
    /// version, set verbatim rather than incremented.
    pub fn into_patch(self) -> BookPatch {
        BookPatch {
            title: self.title,
            topic: self.topic,
            quantity: self.quantity,
            price: self.price,
            sequence_number: Some(self.sequence_number + 1),
        }
    }
}

/// Body of a read-repair hop.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncGetRequest {
    /// Highest sequence number seen anywhere along the hop chain.
    pub sequence_number: u64,
    /// Addresses already consulted for this logical read. Prevents cycles;
    /// the chain terminates within at most replica-set-size hops.
    #[serde(default)]
    pub requesters: Vec<String>,
}
