//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command line
//! - [`outbound`] - Driven side: feed, strategy engine, chain, storage

pub mod inbound;
pub mod outbound;
