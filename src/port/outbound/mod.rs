//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the remote collaborators of a dispatch: the
//! feed, the decision engine, the bridge and messaging contracts, the
//! source token, the report signer, the submitter and the record store.

pub mod approval;
pub mod bridge;
pub mod decision;
pub mod feed;
pub mod signer;
pub mod store;
pub mod submit;
