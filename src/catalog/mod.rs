//! Public Catalog Surface
//!
//! The HTTP endpoints consumed by the order service and end clients:
//! item/topic queries, the conditional update entry point, and the
//! diagnostics dump. Reads and writes funnel through the replica
//! coordinator so clients always observe the protocol's guarantees.

pub mod handlers;
pub mod protocol;
