//! Peer Transport
//!
//! Thin reqwest wrapper for the `/rep` surface. Timeouts are short and any
//! transport failure, connect or read, is reported as `None` ("peer
//! unreachable") rather than as an error: the protocol skips dead peers
//! instead of aborting on them.

use std::time::Duration;

use super::protocol::{
    CheckRequest, ENDPOINT_CHECK, ENDPOINT_GET, ENDPOINT_UPDATE, ReplicaRecord, SyncGetRequest,
    SyncUpdateRequest,
};

/// Connection-establishment budget per peer call.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(100);
/// Total round-trip budget per peer call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of a conflict-check call against one peer.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The peer holds nothing newer than the offered baseline.
    Current,
    /// The peer's copy supersedes the baseline; its record is attached.
    Conflict(ReplicaRecord),
}

/// Result of a broadcast write against one peer.
#[derive(Debug)]
pub enum UpdateOutcome {
    Applied,
    /// The peer has advanced past the sender's baseline and rejected the
    /// write.
    Conflict,
}

/// Result of a read-repair hop against one peer.
#[derive(Debug)]
pub enum GetOutcome {
    /// The peer resolved a copy at least as new as the requested floor.
    Record(ReplicaRecord),
    /// Nobody downstream of the peer holds anything newer than the floor.
    NothingNewer,
    /// The peer answered, but with neither a record nor a conflict.
    Failed,
}

pub struct PeerTransport {
    client: reqwest::Client,
}

impl PeerTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("http client construction");
        Self { client }
    }

    /// Asks `peer` whether it holds a copy of `id` newer than
    /// `sequence_number`. `None` means the peer was unreachable.
    pub async fn check(
        &self,
        peer: &str,
        id: u32,
        sequence_number: u64,
    ) -> Option<CheckOutcome> {
        let url = endpoint(peer, ENDPOINT_CHECK, id);
        let response = self
            .client
            .get(url)
            .json(&CheckRequest { sequence_number })
            .send()
            .await
            .ok()?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            let record: ReplicaRecord = response.json().await.ok()?;
            return Some(CheckOutcome::Conflict(record));
        }
        Some(CheckOutcome::Current)
    }

    /// Pushes a confirmed write to `peer`. `None` means the peer was
    /// unreachable and is skipped, not treated as a conflict.
    pub async fn update(
        &self,
        peer: &str,
        id: u32,
        request: &SyncUpdateRequest,
    ) -> Option<UpdateOutcome> {
        let url = endpoint(peer, ENDPOINT_UPDATE, id);
        let response = self.client.put(url).json(request).send().await.ok()?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Some(UpdateOutcome::Conflict);
        }
        Some(UpdateOutcome::Applied)
    }

    /// Forwards a read-repair hop to `peer`. `None` means the peer was
    /// unreachable and the caller should try another candidate.
    pub async fn get(
        &self,
        peer: &str,
        id: u32,
        request: &SyncGetRequest,
    ) -> Option<GetOutcome> {
        let url = endpoint(peer, ENDPOINT_GET, id);
        let response = self.client.get(url).json(request).send().await.ok()?;

        match response.status() {
            reqwest::StatusCode::CONFLICT => Some(GetOutcome::NothingNewer),
            reqwest::StatusCode::OK => match response.json::<ReplicaRecord>().await {
                Ok(record) => Some(GetOutcome::Record(record)),
                Err(_) => None,
            },
            _ => Some(GetOutcome::Failed),
        }
    }
}

impl Default for PeerTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn endpoint(peer: &str, path: &str, id: u32) -> String {
    format!("{}{}/{}", peer.trim_end_matches('/'), path, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        assert_eq!(
            endpoint("http://10.0.0.2:5000/", ENDPOINT_CHECK, 3),
            "http://10.0.0.2:5000/rep/check/3"
        );
        assert_eq!(
            endpoint("http://10.0.0.2:5000", ENDPOINT_GET, 12),
            "http://10.0.0.2:5000/rep/get/12"
        );
    }
}
