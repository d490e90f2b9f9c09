//! Bridge and messaging quotes through the sender contract and its pool.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::contracts::{IOAquaSender, IStargate, SendParam};
use super::EvmConnection;
use crate::domain::{FinalizedPayload, OftReceipt};
use crate::error::{Result, Stage, UpstreamError};
use crate::port::{BridgeLayer, BridgeQuoteRequest};

/// Immutable routing read from the sender contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routes {
    pub pool: Address,
    pub executor: Address,
    pub eid: u32,
}

fn unavailable(stage: Stage, what: &str) -> impl FnOnce(alloy_contract::Error) -> UpstreamError + '_ {
    move |e| UpstreamError::Unavailable {
        stage,
        reason: format!("{what}: {e}"),
    }
}

/// [`BridgeLayer`] backed by `OAquaSender` and its Stargate pool.
pub struct OAquaBridge {
    conn: EvmConnection,
    sender: Address,
    pool_override: Option<Address>,
    routes: Mutex<Option<Routes>>,
}

impl OAquaBridge {
    #[must_use]
    pub fn new(conn: EvmConnection, sender: Address, pool_override: Option<Address>) -> Self {
        Self {
            conn,
            sender,
            pool_override,
            routes: Mutex::new(None),
        }
    }

    /// Pool, destination executor and endpoint id, read once and cached.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the sender cannot be queried.
    pub async fn routes(&self) -> Result<Routes> {
        let cached = *self.routes.lock();
        if let Some(routes) = cached {
            return Ok(routes);
        }

        let provider = self.conn.reader();
        let sender = IOAquaSender::new(self.sender, &provider);

        let pool = match self.pool_override {
            Some(pool) => pool,
            None => sender
                .STARGATE_POOL()
                .call()
                .await
                .map_err(unavailable(Stage::BridgeQuote, "STARGATE_POOL"))?,
        };
        let executor = sender
            .DESTINATION_EXECUTOR()
            .call()
            .await
            .map_err(unavailable(Stage::BridgeQuote, "DESTINATION_EXECUTOR"))?;
        let eid = sender
            .DESTINATION_EID()
            .call()
            .await
            .map_err(unavailable(Stage::BridgeQuote, "DESTINATION_EID"))?;

        let routes = Routes {
            pool,
            executor,
            eid,
        };
        debug!(pool = %pool, executor = %executor, eid, "Sender routes resolved");
        *self.routes.lock() = Some(routes);
        Ok(routes)
    }
}

#[async_trait]
impl BridgeLayer for OAquaBridge {
    async fn quote_bridge_amount(&self, request: &BridgeQuoteRequest) -> Result<OftReceipt> {
        let routes = self.routes().await?;
        let provider = self.conn.reader();
        let pool = IStargate::new(routes.pool, &provider);

        let param = SendParam {
            dstEid: routes.eid,
            to: routes.executor.into_word(),
            amountLD: request.amount_ld,
            minAmountLD: U256::ZERO,
            extraOptions: request.extra_options.clone(),
            composeMsg: request.compose_msg.clone(),
            oftCmd: Bytes::new(),
        };

        let quote = pool
            .quoteOFT(param)
            .call()
            .await
            .map_err(unavailable(Stage::BridgeQuote, "quoteOFT"))?;

        debug!(
            min = %quote.limit.minAmountLD,
            max = %quote.limit.maxAmountLD,
            fee_lines = quote.feeDetails.len(),
            "Stargate quote"
        );
        Ok(OftReceipt {
            amount_sent_ld: quote.receipt.amountSentLD,
            amount_received_ld: quote.receipt.amountReceivedLD,
        })
    }

    async fn quote_message(
        &self,
        payload: &FinalizedPayload,
        extra_options: &Bytes,
        min_amount_ld: U256,
    ) -> Result<U256> {
        let provider = self.conn.reader();
        let sender = IOAquaSender::new(self.sender, &provider);

        let fee = sender
            .quoteSendSwap(payload.to_abi(), extra_options.clone(), min_amount_ld)
            .call()
            .await
            .map_err(unavailable(Stage::MessageQuote, "quoteSendSwap"))?;

        if !fee.lzTokenFee.is_zero() {
            debug!(lz_token_fee = %fee.lzTokenFee, "Quote includes an LZ token fee, paying native only");
        }
        Ok(fee.nativeFee)
    }
}
