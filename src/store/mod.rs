//! Record Store
//!
//! In-memory table of book records keyed by id, plus the version clock
//! semantics every replica relies on: each record carries a monotonically
//! increasing `sequence_number` that advances by exactly one on every normal
//! mutation, or is set verbatim when a replica adopts a peer's copy.

pub mod books;

#[cfg(test)]
mod tests;
