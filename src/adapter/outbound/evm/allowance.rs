//! ERC-20 allowance for the bridged source token.

use alloy_primitives::{Address, U256};
use alloy_provider::network::ReceiptResponse;
use async_trait::async_trait;
use tracing::info;

use super::contracts::IERC20;
use super::EvmConnection;
use crate::error::{ExecutionError, Result, Stage, UpstreamError};
use crate::port::{ApprovalResult, TokenAllowance};

/// Allowance adapter bound to one token and the connection's wallet.
pub struct Erc20Allowance {
    conn: EvmConnection,
    token: Address,
}

impl Erc20Allowance {
    #[must_use]
    pub fn new(conn: EvmConnection, token: Address) -> Self {
        Self { conn, token }
    }
}

#[async_trait]
impl TokenAllowance for Erc20Allowance {
    async fn allowance(&self, spender: Address) -> Result<U256> {
        let provider = self.conn.reader();
        let token = IERC20::new(self.token, &provider);
        let allowance = token
            .allowance(self.conn.address(), spender)
            .call()
            .await
            .map_err(|e| UpstreamError::Unavailable {
                stage: Stage::Allowance,
                reason: format!("allowance: {e}"),
            })?;
        Ok(allowance)
    }

    async fn balance(&self) -> Result<U256> {
        let provider = self.conn.reader();
        let token = IERC20::new(self.token, &provider);
        let balance = token
            .balanceOf(self.conn.address())
            .call()
            .await
            .map_err(|e| UpstreamError::Unavailable {
                stage: Stage::Balance,
                reason: format!("balanceOf: {e}"),
            })?;
        Ok(balance)
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<ApprovalResult> {
        info!(
            owner = %self.conn.address(),
            token = %self.token,
            spender = %spender,
            amount = %amount,
            "Submitting approval"
        );

        let provider = self.conn.writer();
        let token = IERC20::new(self.token, &provider);

        let pending_tx = token
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| ExecutionError::ApprovalFailed(format!("send: {e}")))?;

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| ExecutionError::ApprovalFailed(format!("receipt: {e}")))?;

        if !receipt.status() {
            return Ok(ApprovalResult::Failed {
                reason: format!("approval {} reverted", receipt.transaction_hash),
            });
        }

        Ok(ApprovalResult::Approved {
            tx_hash: receipt.transaction_hash,
            amount,
        })
    }

    fn token(&self) -> Address {
        self.token
    }
}
