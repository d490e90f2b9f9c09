//! Token allowance and balance port for the source-chain token.
//!
//! The adapter is bound to one token and one owner (the wallet). The spender
//! is passed per call.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How much to approve when the allowance is short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    /// Approve exactly the amount being bridged.
    #[default]
    Exact,
    /// Approve `U256::MAX` once.
    Unlimited,
}

impl ApprovalPolicy {
    /// Amount to approve for a transfer of `required`.
    #[must_use]
    pub fn amount_for(self, required: U256) -> U256 {
        match self {
            Self::Exact => required,
            Self::Unlimited => U256::MAX,
        }
    }
}

/// Result of a token approval operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalResult {
    /// Approval transaction was mined.
    Approved {
        /// Transaction hash for tracking.
        tx_hash: B256,

        /// Amount approved for spending.
        amount: U256,
    },

    /// Approval transaction failed.
    Failed {
        /// Human-readable error description.
        reason: String,
    },
}

/// Port for reading and raising an ERC-20 allowance.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait TokenAllowance: Send + Sync {
    /// Current allowance granted by the wallet to `spender`.
    ///
    /// # Errors
    ///
    /// Returns an error if the allowance cannot be read from the chain.
    async fn allowance(&self, spender: Address) -> Result<U256>;

    /// Wallet balance of the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be read from the chain.
    async fn balance(&self) -> Result<U256>;

    /// Approve `spender` for `amount` and wait for the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be submitted.
    async fn approve(&self, spender: Address, amount: U256) -> Result<ApprovalResult>;

    /// Token being approved.
    fn token(&self) -> Address;
}
