//! Ghostline - crisis-triggered cross-chain liquidity dispatch.
//!
//! A market-intelligence feed is polled on a schedule. When it reports a
//! crisis, a strategy engine proposes candidate positions, and the top
//! candidate is turned into a swap payload that is bridged from the source
//! chain to a destination liquidity engine in one signed transaction.
//!
//! # Architecture
//!
//! - [`domain`] - Payloads, amounts, fees, strategy identity, reports
//! - [`port`] - Traits the application depends on
//! - [`application`] - Fee quoting, payload building, dispatch, the cycle
//! - [`adapter`] - HTTP feed, EVM contracts, JSON store, CLI
//! - [`infrastructure`] - Configuration and wiring
//!
//! # Features
//!
//! - `testkit` - Scripted in-memory implementations of every port

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(feature = "testkit")]
pub mod testkit;
