//! Messaging fee quoting with a safety buffer.

use std::sync::Arc;

use alloy_primitives::{Bytes, U256};
use tracing::{info, warn};

use super::retry::RetryPolicy;
use crate::domain::{Bps, DomainError, FeeQuote, FinalizedPayload};
use crate::error::{Result, Stage, UpstreamError};
use crate::port::BridgeLayer;

/// What the messaging layer needs to price one message.
#[derive(Debug, Clone, Copy)]
pub struct FeeRequest<'a> {
    pub payload: &'a FinalizedPayload,
    pub extra_options: &'a Bytes,
    pub min_amount_ld: U256,
}

/// Quotes the native fee for a dispatch and applies the configured margin.
pub struct FeeQuoter {
    bridge: Arc<dyn BridgeLayer>,
    margin: Bps,
    retry: RetryPolicy,
}

impl FeeQuoter {
    #[must_use]
    pub fn new(bridge: Arc<dyn BridgeLayer>, margin: Bps, retry: RetryPolicy) -> Self {
        Self {
            bridge,
            margin,
            retry,
        }
    }

    #[must_use]
    pub const fn margin(&self) -> Bps {
        self.margin
    }

    /// Quote the fee for `request`, or take `fee_override` verbatim.
    ///
    /// An override skips the messaging layer entirely and is not buffered.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::BadQuote`] when the messaging layer quotes zero.
    /// - [`DomainError::ZeroAmount`] for a zero override.
    /// - Upstream failures and timeouts once the retry budget is spent.
    pub async fn quote(
        &self,
        request: &FeeRequest<'_>,
        fee_override: Option<U256>,
    ) -> Result<FeeQuote> {
        if let Some(fee) = fee_override {
            if fee.is_zero() {
                return Err(DomainError::ZeroAmount {
                    field: "native_fee_override",
                }
                .into());
            }
            warn!(fee_wei = %fee, "Using manual native fee override, buffer disabled");
            return Ok(FeeQuote::overridden(fee));
        }

        let native_fee = self
            .retry
            .run(Stage::MessageQuote, |_| {
                self.bridge.quote_message(
                    request.payload,
                    request.extra_options,
                    request.min_amount_ld,
                )
            })
            .await?;

        if native_fee.is_zero() {
            return Err(UpstreamError::BadQuote {
                stage: Stage::MessageQuote,
                reason: "native fee is zero".into(),
            }
            .into());
        }

        let quote = FeeQuote::quoted(native_fee, self.margin);
        info!(
            native_fee_wei = %quote.native_fee(),
            buffered_fee_wei = %quote.buffered_fee(),
            margin = %self.margin,
            "Messaging fee quoted"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use alloy_primitives::{Address, B256};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::domain::payload::SwapPayload;
    use crate::domain::{FeeSource, OftReceipt};
    use crate::error::Error;
    use crate::port::BridgeQuoteRequest;

    /// `None` answers with an unavailable error.
    struct QueuedFees {
        answers: Mutex<VecDeque<Option<U256>>>,
        calls: Mutex<usize>,
    }

    impl QueuedFees {
        fn new(answers: impl IntoIterator<Item = Option<U256>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into_iter().collect()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl BridgeLayer for QueuedFees {
        async fn quote_bridge_amount(&self, _request: &BridgeQuoteRequest) -> Result<OftReceipt> {
            unreachable!("fee quoting never prices the bridge")
        }

        async fn quote_message(
            &self,
            _payload: &FinalizedPayload,
            _extra_options: &Bytes,
            _min_amount_ld: U256,
        ) -> Result<U256> {
            *self.calls.lock() += 1;
            match self.answers.lock().pop_front().flatten() {
                Some(fee) => Ok(fee),
                None => Err(UpstreamError::Unavailable {
                    stage: Stage::MessageQuote,
                    reason: "rpc down".into(),
                }
                .into()),
            }
        }
    }

    fn payload() -> FinalizedPayload {
        FinalizedPayload::freeze(SwapPayload {
            maker: Address::repeat_byte(0xaa),
            token_in: Address::repeat_byte(0x01),
            token_out: Address::repeat_byte(0x02),
            recipient: Address::repeat_byte(0xbb),
            amount_ld: U256::from(9_994),
            min_amount_out_ld: U256::from(9_944),
            maker_traits: U256::ZERO,
            program: Bytes::from_static(&[0x11, 0x00]),
            taker_traits_and_data: Bytes::new(),
            strategy_salt: B256::repeat_byte(0x01),
            strategy_tokens: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
            strategy_balances: vec![U256::from(9_994), U256::ZERO],
            metadata: Bytes::new(),
        })
    }

    fn quoter(bridge: Arc<QueuedFees>) -> FeeQuoter {
        let retry = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_secs(1));
        FeeQuoter::new(bridge, Bps::new(2_000), retry)
    }

    async fn quote(quoter: &FeeQuoter, fee_override: Option<U256>) -> Result<FeeQuote> {
        let payload = payload();
        let options = Bytes::new();
        let request = FeeRequest {
            payload: &payload,
            extra_options: &options,
            min_amount_ld: U256::from(9_944),
        };
        quoter.quote(&request, fee_override).await
    }

    #[tokio::test]
    async fn quoted_fee_is_buffered() {
        let bridge = QueuedFees::new([Some(U256::from(100))]);
        let quote = quote(&quoter(Arc::clone(&bridge)), None).await.unwrap();

        assert_eq!(quote.native_fee(), U256::from(100));
        assert_eq!(quote.buffered_fee(), U256::from(120));
        assert_eq!(quote.source(), FeeSource::Quoted);
        assert_eq!(bridge.calls(), 1);
    }

    #[tokio::test]
    async fn override_is_used_verbatim() {
        let bridge = QueuedFees::new([]);
        let quote = quote(&quoter(Arc::clone(&bridge)), Some(U256::from(777)))
            .await
            .unwrap();

        assert_eq!(quote.buffered_fee(), U256::from(777));
        assert_eq!(quote.source(), FeeSource::Override);
        assert_eq!(bridge.calls(), 0);
    }

    #[tokio::test]
    async fn zero_quote_is_rejected() {
        let bridge = QueuedFees::new([Some(U256::ZERO)]);
        let err = quote(&quoter(bridge), None).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Upstream(UpstreamError::BadQuote {
                stage: Stage::MessageQuote,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unavailable_messaging_layer_is_retried() {
        let bridge = QueuedFees::new([None, Some(U256::from(50))]);
        let quote = quote(&quoter(Arc::clone(&bridge)), None).await.unwrap();

        assert_eq!(quote.buffered_fee(), U256::from(60));
        assert_eq!(bridge.calls(), 2);
    }
}
