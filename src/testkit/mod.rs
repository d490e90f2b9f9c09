//! Shared test utilities for integration tests.
//!
//! Enabled via the `testkit` feature.
//!
//! - [`chain`] - Scripted bridge, allowance and submitter ports sharing a
//!   [`CallLog`](chain::CallLog) for ordering assertions.
//! - [`feed`] - Scripted feed source, strategy engine and feed fixtures.
//! - [`domain`] - Canonical addresses, candidates and contexts.
//! - [`harness`] - A [`SwapDispatcher`](crate::application::SwapDispatcher)
//!   wired to the scripted ports.

pub mod chain;
pub mod domain;
pub mod feed;
pub mod harness;
