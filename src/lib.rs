//! Replicated Bookstore Catalog Library
//!
//! One process built from this crate is a single catalog replica: it serves
//! the public query/update surface, participates in the sequence-number
//! replication protocol with its peers, and notifies the front-end cache
//! after successful writes.
//!
//! ## Architecture Modules
//! - **`store`**: the record store and version clock. Owns all persisted
//!   record state; the only writer allowed to set a sequence number
//!   verbatim (instead of incrementing it) is the replication adopt path.
//! - **`replication`**: the consistency core. Conflict-check and broadcast
//!   rounds on writes, random-peer read repair with a visited set on reads,
//!   and the process-lifetime freshness cache that short-circuits both.
//! - **`catalog`**: the public HTTP surface consumed by the order service
//!   and end clients.
//! - **`cache`**: fire-and-forget invalidation calls to the front-end
//!   cache after successful writes.
//! - **`config`** / **`node`**: environment-derived settings and the
//!   assembly of one replica process.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod node;
pub mod replication;
pub mod store;
