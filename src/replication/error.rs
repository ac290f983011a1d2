use thiserror::Error;

/// Failure taxonomy of the replication protocol.
///
/// Peer unreachability is deliberately absent: transport failures are
/// absorbed inside [`super::transport::PeerTransport`] and never escalate
/// past the point of contact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplicationError {
    /// The id is not present in the local record store.
    #[error("no book with id {0}")]
    NotFound(u32),

    /// The operation was computed against a superseded version of the
    /// record. Recoverable: the caller must re-read and retry.
    #[error("the local view of book {0} has been superseded by a peer")]
    Outdated(u32),

    /// A read hop chain reported failure without resolving a record.
    #[error("no replica could produce an up-to-date copy of book {0}")]
    CouldNotResolve(u32),
}
