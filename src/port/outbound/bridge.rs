//! Bridging and cross-chain messaging port.

use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;

use crate::domain::{FinalizedPayload, OftReceipt};
use crate::error::Result;

/// Request for a bridge-amount quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeQuoteRequest {
    /// Amount to send, in source local decimals.
    pub amount_ld: U256,
    /// Encoded payload carried as the compose message.
    pub compose_msg: Bytes,
    /// Executor options for the destination.
    pub extra_options: Bytes,
}

/// Quotes exposed by the bridge token pool and the messaging sender.
///
/// Both calls are read-only and safe to retry.
#[async_trait]
pub trait BridgeLayer: Send + Sync {
    /// Quote how much of `amount_ld` arrives on the destination.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the pool cannot be reached or answers
    /// with an unusable quote.
    async fn quote_bridge_amount(&self, request: &BridgeQuoteRequest) -> Result<OftReceipt>;

    /// Quote the native messaging fee for sending `payload`.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the sender cannot be reached.
    async fn quote_message(
        &self,
        payload: &FinalizedPayload,
        extra_options: &Bytes,
        min_amount_ld: U256,
    ) -> Result<U256>;
}
