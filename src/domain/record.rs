//! Persisted record of the most recent dispatch.

use alloy_primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::{payload_strategy_hash, StrategyHash};
use super::payload::SwapPayload;

/// Everything needed to find a dispatched strategy on the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub maker: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub strategy_tokens: Vec<Address>,
    pub program: Bytes,
    pub maker_traits: U256,
    pub salt: B256,
    pub strategy_hash: StrategyHash,
    /// `None` for dry runs.
    pub tx_hash: Option<B256>,
    pub amount_ld: U256,
    pub buffered_fee: U256,
    pub incident: String,
    pub dispatched_at: DateTime<Utc>,
}

impl DispatchRecord {
    #[must_use]
    pub fn from_payload(
        payload: &SwapPayload,
        tx_hash: Option<B256>,
        buffered_fee: U256,
        incident: impl Into<String>,
        dispatched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            maker: payload.maker,
            token_in: payload.token_in,
            token_out: payload.token_out,
            strategy_tokens: payload.strategy_tokens.clone(),
            program: payload.program.clone(),
            maker_traits: payload.maker_traits,
            salt: payload.strategy_salt,
            strategy_hash: payload_strategy_hash(payload),
            tx_hash,
            amount_ld: payload.amount_ld,
            buffered_fee,
            incident: incident.into(),
            dispatched_at,
        }
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.tx_hash.is_none()
    }
}
