//! Replica Consistency Protocol
//!
//! Keeps independent catalog replicas convergent using per-record sequence
//! numbers as the sole consistency signal.
//!
//! ## Core Concepts
//! - **Conflict check**: before an unconfirmed write, every peer is asked
//!   whether it holds a newer copy; the newest conflicting copy is adopted
//!   locally and the write is rejected as outdated.
//! - **Broadcast**: confirmed writes are pushed to every reachable peer;
//!   a single peer rejection aborts the write.
//! - **Read repair**: reads hop through peers at random, pulling the most
//!   current copy found back into the local store.
//! - **Freshness cache**: ids reconciled with the replica set once are
//!   served locally until process restart.

pub mod coordinator;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod transport;

#[cfg(test)]
mod tests;
