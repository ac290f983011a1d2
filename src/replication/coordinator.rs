//! Replica Coordinator
//!
//! The protocol engine of one catalog replica. Local request handlers go
//! through [`ReplicaCoordinator::update`] and [`ReplicaCoordinator::get`];
//! remote coordinators reach this node through the `/rep` handlers, which
//! run against the same state.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use rand::Rng;
use tokio::sync::Mutex;

use super::error::ReplicationError;
use super::protocol::{ReplicaRecord, SyncGetRequest, SyncUpdateRequest};
use super::transport::{CheckOutcome, GetOutcome, PeerTransport, UpdateOutcome};
use crate::store::books::{Book, BookPatch, BookStore};

/// Process-lifetime memo of ids believed synchronized with the replica set.
///
/// Entries are added whenever a peer round confirms this replica holds, or
/// now holds, the most current version. They are never removed; only a
/// process restart clears the cache. Marked ids skip all peer traffic,
/// which trades staleness for latency.
pub struct FreshnessCache {
    ids: DashMap<u32, ()>,
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self { ids: DashMap::new() }
    }

    pub fn mark(&self, id: u32) {
        self.ids.insert(id, ());
    }

    pub fn is_fresh(&self, id: u32) -> bool {
        self.ids.contains_key(&id)
    }
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReplicaCoordinator {
    store: Arc<BookStore>,
    /// Static peer base addresses, excluding this node.
    peers: Vec<String>,
    /// This node's advertised base address, appended to the visited set
    /// when a read is forwarded.
    self_address: String,
    fresh: FreshnessCache,
    transport: PeerTransport,
    /// One async mutex per id keeps the check, broadcast, commit sequence
    /// of a write from interleaving with another local write for the same
    /// record.
    write_locks: DashMap<u32, Arc<Mutex<()>>>,
}

impl ReplicaCoordinator {
    pub fn new(store: Arc<BookStore>, peers: Vec<String>, self_address: String) -> Self {
        Self {
            store,
            peers,
            self_address,
            fresh: FreshnessCache::new(),
            transport: PeerTransport::new(),
            write_locks: DashMap::new(),
        }
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    #[cfg(test)]
    pub(crate) fn is_fresh(&self, id: u32) -> bool {
        self.fresh.is_fresh(id)
    }

    fn write_lock(&self, id: u32) -> Arc<Mutex<()>> {
        self.write_locks.entry(id).or_default().clone()
    }

    /// Write path: conflict check, broadcast, local commit.
    ///
    /// Fails with [`ReplicationError::Outdated`] when any peer has already
    /// superseded the local baseline; the caller must re-read and retry
    /// against the newly adopted state.
    pub async fn update(&self, id: u32, patch: &BookPatch) -> Result<Book, ReplicationError> {
        // Standalone replica: nothing to coordinate with.
        if self.peers.is_empty() {
            return self
                .store
                .update(id, patch)
                .ok_or(ReplicationError::NotFound(id));
        }

        let lock = self.write_lock(id);
        let _guard = lock.lock().await;

        let book = self
            .store
            .get(id)
            .ok_or(ReplicationError::NotFound(id))?;
        let baseline = book.sequence_number;

        if !self.fresh.is_fresh(id) {
            let checks = self
                .peers
                .iter()
                .map(|peer| self.transport.check(peer, id, baseline));

            // Track the newest conflicting copy across the whole round.
            let mut newest: Option<ReplicaRecord> = None;
            for outcome in join_all(checks).await {
                match outcome {
                    Some(CheckOutcome::Conflict(record)) => {
                        let best = newest
                            .as_ref()
                            .map_or(baseline, |found| found.sequence_number);
                        if record.sequence_number > best {
                            newest = Some(record);
                        }
                    }
                    Some(CheckOutcome::Current) | None => {}
                }
            }

            // Reconciled with every reachable peer either way.
            self.fresh.mark(id);

            if let Some(record) = newest {
                tracing::debug!(
                    id,
                    theirs = record.sequence_number,
                    ours = baseline,
                    "write baseline superseded, adopting peer copy"
                );
                self.store.update(id, &record.into_patch());
                return Err(ReplicationError::Outdated(id));
            }
        }

        let request = SyncUpdateRequest::new(baseline, patch);
        for peer in &self.peers {
            match self.transport.update(peer, id, &request).await {
                Some(UpdateOutcome::Conflict) => {
                    // First rejection aborts the write without applying it
                    // locally.
                    tracing::debug!(id, %peer, "broadcast rejected, aborting write");
                    return Err(ReplicationError::Outdated(id));
                }
                Some(UpdateOutcome::Applied) => {}
                None => {
                    tracing::debug!(id, %peer, "peer unreachable during broadcast, skipping");
                }
            }
        }

        let committed = self
            .store
            .update(id, patch)
            .ok_or(ReplicationError::NotFound(id))?;
        self.fresh.mark(id);
        Ok(committed)
    }

    /// Read path: serve fresh ids locally, otherwise hop through peers for
    /// the most current copy and adopt it.
    ///
    /// `hint` is the highest sequence number seen by earlier hops of the
    /// chain; `visited` lists the addresses those hops already consulted.
    pub async fn get(
        &self,
        id: u32,
        hint: Option<u64>,
        visited: &[String],
    ) -> Result<Book, ReplicationError> {
        if self.fresh.is_fresh(id) {
            if let Some(book) = self.store.get(id) {
                return Ok(book);
            }
        }

        let book = self
            .store
            .get(id)
            .ok_or(ReplicationError::NotFound(id))?;
        let local_sequence = book.sequence_number;

        let floor = match hint {
            Some(hinted) if hinted > local_sequence => hinted,
            _ => local_sequence,
        };

        let mut candidates: Vec<&String> = self
            .peers
            .iter()
            .filter(|peer| !contains_address(visited, peer))
            .collect();

        // Chain exhausted: this copy is as current as anything reachable.
        if candidates.is_empty() {
            self.fresh.mark(id);
            return Ok(book);
        }

        let mut requesters = visited.to_vec();
        requesters.push(self.self_address.clone());
        let request = SyncGetRequest {
            sequence_number: floor,
            requesters,
        };

        let outcome = loop {
            if candidates.is_empty() {
                // Every remaining candidate was unreachable.
                self.fresh.mark(id);
                return Ok(book);
            }
            let pick = rand::thread_rng().gen_range(0..candidates.len());
            let peer = candidates.swap_remove(pick);
            match self.transport.get(peer, id, &request).await {
                Some(outcome) => break outcome,
                None => {
                    tracing::debug!(id, %peer, "peer unreachable during read, trying another");
                }
            }
        };

        match outcome {
            GetOutcome::NothingNewer => {
                if hint.is_some_and(|hinted| hinted > local_sequence) {
                    // An earlier hop has seen something newer than anything
                    // this chain could produce.
                    Err(ReplicationError::Outdated(id))
                } else {
                    self.fresh.mark(id);
                    Ok(book)
                }
            }
            GetOutcome::Record(record) => {
                tracing::debug!(
                    id,
                    theirs = record.sequence_number,
                    ours = local_sequence,
                    "adopting peer copy from read repair"
                );
                self.store.update(id, &record.into_patch());
                self.fresh.mark(id);
                self.store.get(id).ok_or(ReplicationError::NotFound(id))
            }
            GetOutcome::Failed => Err(ReplicationError::CouldNotResolve(id)),
        }
    }
}

/// Scheme-insensitive base-address comparison for visited-set membership.
pub fn normalized(address: &str) -> &str {
    address
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/')
}

pub fn contains_address(addresses: &[String], candidate: &str) -> bool {
    addresses
        .iter()
        .any(|address| normalized(address) == normalized(candidate))
}
