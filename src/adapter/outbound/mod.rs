//! Outbound adapters (driven side).

pub mod agent;
pub mod evm;
pub mod feed;
pub mod store;
